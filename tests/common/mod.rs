use std::fs::File;
use std::io::Error;
use std::path::Path;

pub fn generate_charge_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["type", "user", "amount"])?;
    for _ in 0..rows {
        wtr.write_record(["charge", "1", "1"])?;
    }
    wtr.flush()?;
    Ok(())
}
