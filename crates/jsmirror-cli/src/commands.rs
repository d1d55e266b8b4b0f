//! Available subcommands.

use std::path::PathBuf;

use clap::Subcommand;

/// Default location of the upload target document.
pub const DEFAULT_UPLOAD_CONFIG: &str = "./.oss-sync.json";

#[derive(Subcommand)]
pub enum Commands {
    /// Mirror libraries into the destination and regenerate the manifest
    Sync {
        /// Libraries as NAME or NAME@SELECTOR (e.g. "react@>=18.0.0", "vue@latest")
        libraries: Vec<String>,
        /// JSON file holding one descriptor or a list of {"name", "version"} descriptors
        #[arg(long = "libs", value_name = "FILE")]
        libs_file: Option<PathBuf>,
        /// Previously generated manifest (path or URL); only missing versions are fetched
        #[arg(long, env = "JSMIRROR_MANIFEST", value_name = "SRC")]
        manifest: Option<String>,
        /// Upload the mirror afterwards; the target file is given as --upload=FILE
        #[arg(
            long,
            value_name = "FILE",
            num_args = 0..=1,
            require_equals = true,
            default_missing_value = DEFAULT_UPLOAD_CONFIG
        )]
        upload: Option<PathBuf>,
    },

    /// Print the versions and files a library request resolves to
    Query {
        /// Library as NAME or NAME@SELECTOR
        library: String,
        /// Manifest to diff against (path or URL)
        #[arg(long, env = "JSMIRROR_MANIFEST", value_name = "SRC")]
        manifest: Option<String>,
    },

    /// Regenerate manifest documents from the destination tree
    Manifest,

    /// Push the destination to object storage
    Upload {
        /// Upload target file
        #[arg(value_name = "FILE", default_value = DEFAULT_UPLOAD_CONFIG)]
        config: PathBuf,
    },
}
