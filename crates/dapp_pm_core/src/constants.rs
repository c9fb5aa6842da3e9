/// Directories under a vendored tree that are searched for sources, in walk order.
pub const SOURCE_DIRS: &[&str] = &["src", "contracts", "libs"];

/// Extension of the source files tracked by the graph.
pub const SOL_EXTENSION: &str = "sol";

/// Matches `import "path"`, `import 'path'` and `import <bindings> from "path"`.
/// Group 1 holds a double-quoted path, group 2 a single-quoted one.
///
/// Word and space classes are ASCII only: bindings are `[0-9A-Za-z_]`, spaces
/// are `[\t\n\f\r ]`.
pub const IMPORT_PATTERN: &str = concat!(
    r#"import[\t\n\f\r ]+?"#,
    r#"(?:[0-9A-Za-z_*\t\n\f\r {},]*[\t\n\f\r ]+from[\t\n\f\r ]+?)?"#,
    r#"(?:"(.*?)"|'(.*?)')[\t\n\f\r ]*?(?:;|$)?"#,
);

/// `owner/repo@[v]MAJOR.MINOR.PATCH[-prerelease][+build]`
pub const DEPENDENCY_PATTERN: &str = concat!(
    r"^(?P<name>[^\s@/]+/[^\s@/]+)@",
    r"(?P<version>v?(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)",
    r"(?:-(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*)?",
    r"(?:\+[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*)?)$",
);

/// Name of the tool's cache directory under the user's home.
pub const CACHE_DIR_NAME: &str = ".dapp-pm";

/// A project root is recognised by this file.
pub const PROJECT_MARKER: &str = "Makefile";
