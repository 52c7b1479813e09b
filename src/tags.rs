//! Resolution of the environment tags shared by every record of a run.

use constants::{APP_DEFAULT, APP_TAG, BUILD_DEFAULT, BUILD_TAG, SERVER_DEFAULT, SERVER_TAG,
                TEST_DEFAULT, TEST_TAG};
use metric::TagMap;

/// Environment tag configuration, each entry optional.
///
/// Populated from the configuration file and command line, see
/// `config::parse_args`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagConfig {
    /// Test type, e.g. WEB or LOAD
    pub test: Option<String>,
    /// Build identifier
    pub build: Option<String>,
    /// Application name
    pub app: Option<String>,
    /// Server or stage name, e.g. STG, PRF, DEV
    pub server: Option<String>,
}

impl TagConfig {
    /// Overlay `other` onto self: entries set in `other` win.
    pub fn overlay(&mut self, other: &TagConfig) {
        fn pick(mine: &mut Option<String>, theirs: &Option<String>) {
            if theirs.is_some() {
                *mine = theirs.clone();
            }
        }
        pick(&mut self.test, &other.test);
        pick(&mut self.build, &other.build);
        pick(&mut self.app, &other.app);
        pick(&mut self.server, &other.server);
    }
}

/// Resolve the environment tags.
///
/// Unset entries fall back to a fixed default per tag. For build that
/// default is the literal string "build".
pub fn resolve(config: &TagConfig) -> TagMap {
    let mut tags = TagMap::default();
    tags.insert(TEST_TAG, config.test.as_ref().map_or(TEST_DEFAULT, |s| s.as_str()));
    tags.insert(BUILD_TAG, config.build.as_ref().map_or(BUILD_DEFAULT, |s| s.as_str()));
    tags.insert(APP_TAG, config.app.as_ref().map_or(APP_DEFAULT, |s| s.as_str()));
    tags.insert(SERVER_TAG, config.server.as_ref().map_or(SERVER_DEFAULT, |s| s.as_str()));
    tags
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::{QuickCheck, TestResult};

    #[test]
    fn defaults_when_unset() {
        let tags = resolve(&TagConfig::default());
        assert_eq!(4, tags.len());
        assert_eq!(Some("WEB"), tags.get("test"));
        assert_eq!(Some("build"), tags.get("build"));
        assert_eq!(Some("app"), tags.get("app"));
        assert_eq!(Some("server"), tags.get("server"));
    }

    #[test]
    fn missing_build_only() {
        let config = TagConfig {
            test: Some("LOAD".into()),
            build: None,
            app: Some("checkout".into()),
            server: Some("PRF".into()),
        };
        let tags = resolve(&config);
        assert_eq!(Some("LOAD"), tags.get("test"));
        assert_eq!(Some("build"), tags.get("build"));
        assert_eq!(Some("checkout"), tags.get("app"));
        assert_eq!(Some("PRF"), tags.get("server"));
    }

    #[test]
    fn overlay_keeps_unset_entries() {
        let mut base = TagConfig {
            test: Some("LOAD".into()),
            build: Some("41".into()),
            app: None,
            server: None,
        };
        base.overlay(&TagConfig {
            build: Some("42".into()),
            ..TagConfig::default()
        });
        assert_eq!(Some("LOAD".to_string()), base.test);
        assert_eq!(Some("42".to_string()), base.build);
        assert_eq!(None, base.app);
    }

    #[test]
    fn resolve_is_idempotent() {
        fn inner(
            test: Option<String>,
            build: Option<String>,
            app: Option<String>,
            server: Option<String>,
        ) -> TestResult {
            let config = TagConfig {
                test: test,
                build: build,
                app: app,
                server: server,
            };
            let first = resolve(&config);
            let second = resolve(&config);
            if first != second || first.len() != 4 {
                return TestResult::failed();
            }
            TestResult::passed()
        }
        QuickCheck::new().tests(1000).quickcheck(
            inner
                as fn(Option<String>, Option<String>, Option<String>, Option<String>)
                    -> TestResult,
        );
    }
}
