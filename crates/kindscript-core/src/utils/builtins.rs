//! Node.js built-in module detection.

/// Built-in runtime modules. Subpaths such as `fs/promises` resolve to their
/// first segment.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Returns true if `specifier` names a runtime built-in.
///
/// Any `node:`-prefixed specifier is a built-in, including prefix-only
/// modules such as `node:test` or `node:sqlite`. Bare names (`fs`) and
/// bare names with a subpath (`fs/promises`) are looked up in the list.
/// Relative paths and scoped packages never match.
#[must_use]
pub fn is_node_builtin(specifier: &str) -> bool {
    if specifier.starts_with('.') || specifier.starts_with('/') || specifier.starts_with('@') {
        return false;
    }
    if specifier.starts_with("node:") {
        return true;
    }
    let head = specifier.split('/').next().unwrap_or(specifier);
    NODE_BUILTINS.contains(&head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_prefixed_builtins() {
        assert!(is_node_builtin("fs"));
        assert!(is_node_builtin("node:fs"));
        assert!(is_node_builtin("node:child_process"));
        assert!(is_node_builtin("node:test"));
        assert!(is_node_builtin("node:sqlite"));
        assert!(is_node_builtin("node:sea"));
        assert!(!is_node_builtin("test"));
    }

    #[test]
    fn builtin_subpaths() {
        assert!(is_node_builtin("fs/promises"));
        assert!(is_node_builtin("node:stream/web"));
    }

    #[test]
    fn relative_and_third_party_are_allowed() {
        assert!(!is_node_builtin("./fs"));
        assert!(!is_node_builtin("../path"));
        assert!(!is_node_builtin("lodash"));
        assert!(!is_node_builtin("@types/node"));
        assert!(!is_node_builtin("fs-extra"));
    }
}
