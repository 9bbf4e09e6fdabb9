pub mod command_reader;
pub mod record_writer;
pub mod records;
