use crate::domain::point::UserPoint;
use crate::error::Result;
use std::io::Write;

/// Writes final user point balances as CSV.
pub struct PointWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PointWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_points(&mut self, points: Vec<UserPoint>) -> Result<()> {
        self.writer.write_record(["id", "point", "update_millis"])?;
        for point in points {
            self.writer.serialize((point.id, point.point, point.update_millis))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
