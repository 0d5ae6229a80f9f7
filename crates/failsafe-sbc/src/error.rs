use std::time::Duration;

/// Why a SoC probe produced no temperature. Any of these degrades the reader.
#[derive(thiserror::Error, Debug)]
pub enum SocError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("`{command}` exited with status {code:?}")]
    ExitStatus { command: String, code: Option<i32> },

    #[error("no temperature found in {output:?}")]
    NoMatch { output: String },

    #[error("unparsable temperature {text:?}")]
    Unparsable { text: String },
}
