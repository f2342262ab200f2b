use crate::outcome::ClassifiedOutcome;

/// Receives each outcome as soon as it is classified, in completion order.
pub trait Reporter: Send {
    fn report(&mut self, outcome: &ClassifiedOutcome);
}

impl Reporter for Vec<ClassifiedOutcome> {
    fn report(&mut self, outcome: &ClassifiedOutcome) {
        self.push(outcome.clone());
    }
}
