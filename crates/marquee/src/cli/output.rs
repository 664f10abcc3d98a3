use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Indented JSON
    #[default]
    Pretty,
    /// One JSON document per line
    Json,
}

impl OutputFormat {
    pub fn render<T: Serialize + ?Sized>(self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Json => serde_json::to_string(value),
        }
    }

    pub fn print<T: Serialize + ?Sized>(self, value: &T) -> anyhow::Result<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }
}
