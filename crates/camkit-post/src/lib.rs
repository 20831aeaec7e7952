//! # CamKit Post-Processor
//!
//! Turns toolpaths into G-code for a specific controller family and checks
//! finished programs against the machine envelope.
//!
//! Built-in dialects: `generic_3axis` (default), `fanuc`, `haas`, `mach3`,
//! `linuxcnc` and `grbl`.

pub mod dialect;
pub mod error;
pub mod post_processor;
pub mod setup_sheet;
pub mod validator;

pub use dialect::{CommentStyle, Dialect, DialectRegistry, NumberStyle, DEFAULT_DIALECT};
pub use error::{PostError, PostResult};
pub use post_processor::{compact, operation_tools, PostProcessor, DEFAULT_SAFE_Z};
pub use setup_sheet::{ProgramInfo, SetupOperation, SetupSheet, SetupTool};
pub use validator::{validate_gcode, UNSUPPORTED_CODES};
