pub mod branch_name;

/// Rejects names that would be unsafe or confusing as a branch file name
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\.\.|/|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Branch created by `init`
pub const DEFAULT_BRANCH_NAME: &str = "master";
