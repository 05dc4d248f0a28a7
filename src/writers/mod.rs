pub mod observation_writer;

pub use observation_writer::ObservationWriter;
