use anyhow::Context as _;

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; each field maps to the
/// upper-cased env var of the same name (`database_url` → `DATABASE_URL`).
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> anyhow::Result<Self> {
        envy::from_env().context("failed to load config from environment")
    }

    /// Load from an explicit set of `(KEY, value)` pairs instead of the process env.
    fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).context("failed to load config from vars")
    }
}
