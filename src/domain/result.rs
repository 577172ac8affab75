//! Result type alias for ZOE

use super::errors::ZoeError;

/// Result type alias for ZOE operations
///
/// # Examples
///
/// ```
/// use zoe::domain::result::Result;
/// use zoe::domain::errors::ZoeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ZoeError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ZoeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ZoeError::Report("test error".to_string()));
        assert!(result.is_err());
    }
}
