/// Classification code for a node initialization that succeeded.
pub const NODE_INIT_OK: &str = "NODE_INIT_OK";

/// Classification code for a node that was already initialized.
pub const NODE_ALREADY_INITIALIZED: &str = "NODE_ALREADY_INITIALIZED";

/// Classification code for any other node initialization failure.
pub const NODE_INIT_ERROR: &str = "NODE_INIT_ERROR";

/// Map a node-init outcome to a coarse status code for event details.
///
/// Single-purpose classifier for the node initialization caller site, not
/// a general error taxonomy.
pub fn classify_node_init_result(err: Option<&dyn std::error::Error>) -> &'static str {
    let Some(err) = err else {
        return NODE_INIT_OK;
    };
    let message = err.to_string().to_lowercase();
    if message.contains("already initialized") {
        NODE_ALREADY_INITIALIZED
    } else {
        NODE_INIT_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_ok_when_no_error() {
        assert_eq!(classify_node_init_result(None), NODE_INIT_OK);
    }

    #[test]
    fn test_already_initialized_matched_case_insensitively() {
        let err = io::Error::other("resource ALREADY Initialized by peer");
        assert_eq!(
            classify_node_init_result(Some(&err)),
            NODE_ALREADY_INITIALIZED
        );
    }

    #[test]
    fn test_other_errors_classify_as_init_error() {
        let err = io::Error::other("disk full");
        assert_eq!(classify_node_init_result(Some(&err)), NODE_INIT_ERROR);
    }
}
