pub mod collections;
pub mod find;
pub mod freq;
pub mod local;
pub mod path;
pub mod queue;
pub mod resident;
pub mod stage;
pub mod vars;

pub use collections::collections_command;
pub use find::find_command;
pub use freq::freq_command;
pub use local::local_command;
pub use path::path_command;
pub use queue::queue_command;
pub use resident::resident_command;
pub use stage::stage_command;
pub use vars::vars_command;
