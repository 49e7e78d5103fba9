mod answers;
mod engine;
mod position;
mod respondent;
mod view;

pub use answers::AnswerSet;
pub use engine::WizardEngine;
pub use position::WizardPosition;
pub use respondent::Respondent;
pub use view::{CategoryView, NavControls, StepStatus, StepView, WizardView};
