/*!
 * Namespace root discovery from project manifests
 */

use std::fs;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, warn};

use crate::error::Result;

/// Go module manifest file name
pub const GO_MOD: &str = "go.mod";

/// Build manifests consulted for a base package, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum BuildManifest {
    #[strum(to_string = "build.gradle.kts")]
    GradleKotlin,
    #[strum(to_string = "build.gradle")]
    GradleGroovy,
    #[strum(to_string = "pom.xml")]
    Maven,
}

static GRADLE_KTS_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*group\s*=\s*"([^"]+)""#).expect("gradle kts pattern is valid")
});

static GRADLE_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^\s*group\s*=?\s*['"]([^'"]+)['"]"#).expect("gradle pattern is valid")
});

static MAVEN_PARENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<parent>.*?</parent>").expect("maven parent pattern is valid"));

static MAVEN_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<groupId>\s*([^<\s]+)\s*</groupId>").expect("maven group pattern is valid")
});

impl BuildManifest {
    /// Extract the base package from manifest text
    pub fn base_package(&self, text: &str) -> Option<String> {
        let found = match self {
            Self::GradleKotlin => GRADLE_KTS_GROUP.captures(text).map(|c| c[1].to_string()),
            Self::GradleGroovy => GRADLE_GROUP.captures(text).map(|c| c[1].to_string()),
            Self::Maven => {
                let own = MAVEN_PARENT.replace_all(text, "");
                MAVEN_GROUP.captures(&own).map(|c| c[1].to_string())
            }
        };
        found.filter(|name| !name.is_empty())
    }
}

/// A base package and the manifest it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPackage {
    pub name: String,
    pub manifest: BuildManifest,
}

/// Module path declared by the `module` line of a go.mod text
pub fn parse_module_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("module ") || line.starts_with("module\t"))
        .find_map(|line| line.split_whitespace().nth(1))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Read the module path from `go.mod` in `root`
pub fn read_go_module(root: &Path) -> Result<String> {
    let path = root.join(GO_MOD);
    let text = fs::read_to_string(&path)
        .map_err(|e| crate::error!(Manifest, "cannot read {}: {}", path.display(), e))?;
    parse_module_line(&text)
        .ok_or_else(|| crate::error!(Manifest, "module name not found in {}", path.display()))
}

/// First base package found among the build manifests in `root`
pub fn detect_base_package(root: &Path) -> Option<DetectedPackage> {
    for manifest in BuildManifest::iter() {
        let path = root.join(manifest.to_string());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read build manifest");
                continue;
            }
        };
        match manifest.base_package(&text) {
            Some(name) => {
                debug!(%manifest, package = %name, "detected base package");
                return Some(DetectedPackage { name, manifest });
            }
            None => debug!(%manifest, "no base package declared"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecatError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_module_line() {
        let text = "// comment\nmodule example.com/proj\n\ngo 1.22\n";
        assert_eq!(parse_module_line(text).as_deref(), Some("example.com/proj"));
        assert_eq!(parse_module_line("module \"quoted/mod\"\n").as_deref(), Some("quoted/mod"));
        assert_eq!(parse_module_line("go 1.22\n"), None);
        assert_eq!(parse_module_line("modules x\n"), None);
    }

    #[test]
    fn test_read_go_module() -> io::Result<()> {
        let dir = tempdir()?;
        assert!(matches!(read_go_module(dir.path()), Err(CodecatError::Manifest(_))));

        fs::write(dir.path().join(GO_MOD), "go 1.22\n")?;
        assert!(matches!(read_go_module(dir.path()), Err(CodecatError::Manifest(_))));

        fs::write(dir.path().join(GO_MOD), "module example.com/proj\n")?;
        assert_eq!(read_go_module(dir.path()).unwrap(), "example.com/proj");
        Ok(())
    }

    #[test]
    fn test_manifest_extractors() {
        assert_eq!(
            BuildManifest::GradleKotlin.base_package("plugins {}\ngroup = \"com.acme\"\n").as_deref(),
            Some("com.acme")
        );
        assert_eq!(
            BuildManifest::GradleGroovy.base_package("group 'org.sample'\n").as_deref(),
            Some("org.sample")
        );
        assert_eq!(
            BuildManifest::GradleGroovy.base_package("group = \"org.sample\"\n").as_deref(),
            Some("org.sample")
        );
        let pom = "<project>\n<parent>\n<groupId>org.parent</groupId>\n</parent>\n<groupId>org.child</groupId>\n</project>\n";
        assert_eq!(BuildManifest::Maven.base_package(pom).as_deref(), Some("org.child"));
    }

    #[test]
    fn test_detection_priority() -> io::Result<()> {
        let dir = tempdir()?;
        assert_eq!(detect_base_package(dir.path()), None);

        fs::write(dir.path().join("pom.xml"), "<project><groupId>org.maven</groupId></project>")?;
        fs::write(dir.path().join("build.gradle"), "group 'org.groovy'\n")?;
        let found = detect_base_package(dir.path()).unwrap();
        assert_eq!(found.name, "org.groovy");
        assert_eq!(found.manifest, BuildManifest::GradleGroovy);

        // a kts file without a group falls through to the next manifest
        fs::write(dir.path().join("build.gradle.kts"), "plugins {}\n")?;
        assert_eq!(detect_base_package(dir.path()).unwrap().name, "org.groovy");

        fs::write(dir.path().join("build.gradle.kts"), "group = \"org.kts\"\n")?;
        let found = detect_base_package(dir.path()).unwrap();
        assert_eq!(found.name, "org.kts");
        assert_eq!(found.manifest.to_string(), "build.gradle.kts");
        Ok(())
    }
}
