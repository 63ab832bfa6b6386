pub mod branch_name;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Name of the branch every new repository starts on
pub const DEFAULT_BRANCH: &str = "master";

/// Name of the symbolic reference naming the active branch
pub const HEAD_REF_NAME: &str = "HEAD";

pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};
