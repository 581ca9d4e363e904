pub mod case;
pub mod proceeding;

pub use case::{Case, CaseAttachments, CaseFields, CaseWithProceedings};
pub use proceeding::{Proceeding, ProceedingFields, ProceedingInput};
