pub mod op_reader;
pub mod point_writer;
