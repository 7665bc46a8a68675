//! Configuration access port trait.

/// Read access to sectioned key/value configuration.
///
/// Numeric getters distinguish a missing key (`Ok(None)`) from a value that
/// does not parse (`Err`), so callers can fail instead of falling back to a
/// default.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_double(&self, section: &str, key: &str) -> Result<Option<f64>, String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
