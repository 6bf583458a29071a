use git_version::git_version;
use target_info::Target;

lazy_static::lazy_static! {
    /// `VERSION` without the `Warden/` prefix, as shown by `warden --version`.
    pub static ref SHORT_VERSION: String = VERSION.trim_start_matches("Warden/").to_string();

    /// `SHORT_VERSION` followed by the build platform, as shown by `warden --help`.
    pub static ref LONG_VERSION: String =
        format!(
            "{}\ncommit: {}\nplatform: {}-{}",
            *SHORT_VERSION,
            COMMIT_PREFIX,
            Target::arch(),
            Target::os()
        );
}

/// Version of this build of Warden.
///
/// A plus-sign (`+`) marks a dirty tree. The commit is omitted when the sources carry no git
/// information.
///
/// ## Example
///
/// `Warden/v0.0.1-67da032+`
pub const VERSION: &str = git_version!(
    args = [
        "--always",
        "--dirty=+",
        "--abbrev=7",
        // --match rather than --exclude, older git lacks the latter
        "--match=thiswillnevermatchlol"
    ],
    prefix = "Warden/v0.0.1-",
    fallback = "Warden/v0.0.1"
);

/// First eight characters of the commit this build comes from, without dirty marker.
pub const COMMIT_PREFIX: &str = git_version!(
    args = ["--always", "--abbrev=8", "--match=thiswillnevermatchlol"],
    prefix = "",
    suffix = "",
    cargo_prefix = "",
    cargo_suffix = "",
    fallback = "00000000"
);

/// `VERSION` with the platform appended, e.g. `Warden/v0.0.1-67da032+/x86_64-linux`.
pub fn version_with_platform() -> String {
    format!("{}/{}-{}", VERSION, Target::arch(), Target::os())
}
