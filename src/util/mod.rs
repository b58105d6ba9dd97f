/// Generic functionality for reading/writing serializable object to file
pub mod file_io;
/// Normalization of sample header text into stable sample and patient ids
pub mod stable_id;
