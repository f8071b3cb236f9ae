use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Answer the login page's question and submit the credentials form
    Login,

    /// Pass the robot verification conversation
    Verify,

    /// Repair the calibration file (task JSON)
    Calibration,

    /// Redact personal data with the local model (task CENZURA)
    Censor,

    /// Deduce a street from recorded interrogations (task mp3)
    Interrogations,

    /// Generate an image of the described robot (task robotid)
    RobotImage,

    /// Sort factory notes into people and hardware (task kategorie)
    Categories,

    /// Answer questions about the article draft (task arxiv)
    Arxiv,

    /// Generate keywords for factory reports (task dokumenty)
    Keywords,

    /// Check a text against the moderation endpoint
    Moderate {
        text: String,
    },

    /// Embed a text and store it in a vector collection
    Index {
        #[arg(short, long)]
        collection: String,

        #[arg(long)]
        id: u64,

        text: String,
    },

    /// Find the stored texts closest to a query
    Search {
        #[arg(short, long)]
        collection: String,

        query: String,

        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Construct services by name and report which are usable
    Check {
        /// Service names; all when empty
        names: Vec<String>,
    },
}
