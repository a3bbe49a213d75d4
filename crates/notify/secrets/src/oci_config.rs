//! OCI identity configuration: config file profiles and resource principals.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr as _;
use config::{Config, File, FileFormat};
use serde::Deserialize;

/// Where the OCI CLI keeps its config file.
pub const DEFAULT_CONFIG_LOCATION: &str = "~/.oci/config";

/// API key identity read from a profile of an OCI config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub user: String,
    pub fingerprint: String,
    pub key_file: PathBuf,
    pub tenancy: String,
    pub region: String,
    pub pass_phrase: Option<String>,
}

impl ProfileConfig {
    /// Read a profile from a config file.
    pub fn load(path: &Path, profile: &str) -> color_eyre::eyre::Result<Self> {
        let path = expand_home(path);
        let contents = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("cannot read OCI config {}", path.display()))?;

        Self::parse(&contents, profile)
            .wrap_err_with(|| format!("invalid OCI config {}", path.display()))
    }

    /// Parse a profile out of INI-style config contents.
    ///
    /// Keys missing from the profile fall back to the `DEFAULT` section.
    pub fn parse(contents: &str, profile: &str) -> color_eyre::eyre::Result<Self> {
        let mut sections: HashMap<String, RawProfile> = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Ini))
            .build()?
            .try_deserialize()?;

        let selected = take_section(&mut sections, profile)
            .ok_or_else(|| color_eyre::eyre::eyre!("profile {profile} not found"))?;
        let merged = match take_section(&mut sections, "DEFAULT") {
            Some(defaults) => selected.or(defaults),
            None => selected,
        };

        let require = |value: Option<String>, key: &str| {
            value.ok_or_else(|| color_eyre::eyre::eyre!("profile {profile} is missing {key}"))
        };

        Ok(Self {
            user: require(merged.user, "user")?,
            fingerprint: require(merged.fingerprint, "fingerprint")?,
            key_file: expand_home(Path::new(&require(merged.key_file, "key_file")?)),
            tenancy: require(merged.tenancy, "tenancy")?,
            region: require(merged.region, "region")?,
            pass_phrase: merged.pass_phrase,
        })
    }

    /// Signature key id for API key authentication.
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }
}

/// One INI section as written; any key may be absent.
#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    user: Option<String>,
    fingerprint: Option<String>,
    key_file: Option<String>,
    tenancy: Option<String>,
    region: Option<String>,
    pass_phrase: Option<String>,
}

impl RawProfile {
    /// Fill keys missing here from `fallback`.
    fn or(self, fallback: RawProfile) -> RawProfile {
        RawProfile {
            user: self.user.or(fallback.user),
            fingerprint: self.fingerprint.or(fallback.fingerprint),
            key_file: self.key_file.or(fallback.key_file),
            tenancy: self.tenancy.or(fallback.tenancy),
            region: self.region.or(fallback.region),
            pass_phrase: self.pass_phrase.or(fallback.pass_phrase),
        }
    }
}

/// Section names are matched exactly first, then ignoring ASCII case.
fn take_section(sections: &mut HashMap<String, RawProfile>, name: &str) -> Option<RawProfile> {
    if let Some(section) = sections.remove(name) {
        return Some(section);
    }

    let key = sections
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))?
        .clone();
    sections.remove(&key)
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Resource principal identity injected into OCI Functions and similar runtimes.
#[derive(Clone, PartialEq, Eq)]
pub struct ResourcePrincipal {
    /// Resource principal session token.
    pub rpst: String,
    pub private_pem: String,
    pub passphrase: Option<String>,
    pub region: String,
}

impl std::fmt::Debug for ResourcePrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourcePrincipal")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl ResourcePrincipal {
    /// Read the resource principal from the process environment.
    pub fn from_env() -> color_eyre::eyre::Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Read the resource principal through a variable lookup.
    ///
    /// Token and key variables hold either the value itself or an absolute path to it.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> color_eyre::eyre::Result<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    color_eyre::eyre::eyre!(
                        "resource principal authentication requires {name} (or set OCI_PROFILE)"
                    )
                })
        };

        Ok(Self {
            rpst: value_or_file(require("OCI_RESOURCE_PRINCIPAL_RPST")?)?,
            private_pem: value_or_file(require("OCI_RESOURCE_PRINCIPAL_PRIVATE_PEM")?)?,
            passphrase: lookup("OCI_RESOURCE_PRINCIPAL_PRIVATE_PEM_PASSPHRASE")
                .filter(|v| !v.is_empty())
                .map(value_or_file)
                .transpose()?,
            region: require("OCI_RESOURCE_PRINCIPAL_REGION")?,
        })
    }

    /// Signature key id for resource principal authentication.
    pub fn key_id(&self) -> String {
        format!("ST${}", self.rpst)
    }
}

fn value_or_file(value: String) -> color_eyre::eyre::Result<String> {
    if !Path::new(&value).is_absolute() {
        return Ok(value);
    }

    let contents =
        std::fs::read_to_string(&value).wrap_err_with(|| format!("cannot read {value}"))?;
    Ok(contents.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "
# comment
[DEFAULT]
user=ocid1.user.oc1..default
fingerprint=aa:bb
key_file=/keys/default.pem
tenancy=ocid1.tenancy.oc1..t
region=eu-frankfurt-1

[functions]
user = ocid1.user.oc1..fn
key_file = /keys/fn.pem
";

    #[test]
    fn test_profile_falls_back_to_default_section() {
        let profile = ProfileConfig::parse(CONFIG, "functions").unwrap();
        assert_eq!(profile.user, "ocid1.user.oc1..fn");
        assert_eq!(profile.key_file, PathBuf::from("/keys/fn.pem"));
        assert_eq!(profile.fingerprint, "aa:bb");
        assert_eq!(profile.region, "eu-frankfurt-1");
        assert!(profile.pass_phrase.is_none());
        assert_eq!(profile.key_id(), "ocid1.tenancy.oc1..t/ocid1.user.oc1..fn/aa:bb");
    }

    #[test]
    fn test_pass_phrase_and_comment_lines() {
        let contents = "; api key\n[DEFAULT]\nuser=u\nfingerprint=f\nkey_file=/k.pem\ntenancy=t\nregion=r\npass_phrase=secret\n";
        let profile = ProfileConfig::parse(contents, "DEFAULT").unwrap();
        assert_eq!(profile.pass_phrase.as_deref(), Some("secret"));
        assert_eq!(profile.key_id(), "t/u/f");
    }

    #[test]
    fn test_missing_profile_and_keys() {
        let err = ProfileConfig::parse(CONFIG, "nope").unwrap_err();
        assert_eq!(err.to_string(), "profile nope not found");

        let err = ProfileConfig::parse("[p]\nuser=u\n", "p").unwrap_err();
        assert_eq!(err.to_string(), "profile p is missing fingerprint");
    }

    #[test]
    fn test_resource_principal_from_vars() {
        let vars = HashMap::from([
            ("OCI_RESOURCE_PRINCIPAL_RPST", "token-value"),
            ("OCI_RESOURCE_PRINCIPAL_PRIVATE_PEM", "pem-value"),
            ("OCI_RESOURCE_PRINCIPAL_REGION", "us-ashburn-1"),
        ]);
        let principal =
            ResourcePrincipal::from_vars(|name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(principal.key_id(), "ST$token-value");
        assert_eq!(principal.private_pem, "pem-value");
        assert_eq!(principal.region, "us-ashburn-1");
        assert!(principal.passphrase.is_none());
    }

    #[test]
    fn test_resource_principal_requires_token() {
        let err = ResourcePrincipal::from_vars(|_| None).unwrap_err();
        assert!(err.to_string().contains("OCI_RESOURCE_PRINCIPAL_RPST"));
    }
}
