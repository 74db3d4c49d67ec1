//! Types for representing what to do on each printer.

use crate::config::DeviceEntry;
use crate::core::command::{CommandDocument, SequenceCounter};
use crate::core::option::{CalibrationOptions, OptionMask};
use crate::error::NothingToCalibrate;
use std::time::Duration;

/// The operation requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Home the axes.
    Home,

    /// Home the axes and, unless `home_only` is set, run a calibration after `delay`.
    Calibrate {
        option: OptionMask,
        home_only: bool,
        delay: Duration,
    },
}

/// One step of a printer's command sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Send a document to the printer's request topic.
    Publish(CommandDocument),

    /// Pause before the next step.
    Wait(Duration),
}

/// A validated [Operation], ready to be expanded into [HostPlan]s.
///
/// The plan is the same for every printer; each [HostPlan] gets its own sequence IDs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plan {
    operation: Operation,
}

impl Plan {
    /// A plan that homes each printer.
    pub fn home() -> Self {
        Plan {
            operation: Operation::Home,
        }
    }

    /// A plan that homes each printer and then calibrates it with `options`.
    ///
    /// Fails if no sub-test is selected and `home_only` isn't set, since there would be nothing
    /// to calibrate.
    pub fn calibrate(
        options: CalibrationOptions,
        home_only: bool,
        delay: Duration,
    ) -> Result<Self, NothingToCalibrate> {
        let option = options.encode();
        if option.is_empty() && !home_only {
            return Err(NothingToCalibrate);
        }
        Ok(Plan {
            operation: Operation::Calibrate {
                option,
                home_only,
                delay,
            },
        })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the command sequence for one printer.
    pub fn plan_for<'p>(&self, entry: &'p DeviceEntry) -> HostPlan<'p> {
        let mut sequence = SequenceCounter::new();
        let mut steps = vec![Step::Publish(CommandDocument::home(sequence.next_id()))];

        if let Operation::Calibrate {
            option,
            home_only: false,
            delay,
        } = self.operation
        {
            steps.push(Step::Wait(delay));
            steps.push(Step::Publish(CommandDocument::calibration(
                sequence.next_id(),
                option,
            )));
        }

        HostPlan { entry, steps }
    }
}

/// A [Plan] in the context of a single printer.
#[derive(Debug, PartialEq, Eq)]
pub struct HostPlan<'p> {
    entry: &'p DeviceEntry,
    steps: Vec<Step>,
}

impl<'p> HostPlan<'p> {
    /// The printer this plan runs on.
    pub fn entry(&self) -> &'p DeviceEntry {
        self.entry
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl IntoIterator for HostPlan<'_> {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command::PrintCommand;
    use crate::core::fixtures::entry;

    const DELAY: Duration = Duration::from_secs(3);

    fn bed_leveling() -> CalibrationOptions {
        CalibrationOptions {
            bed_leveling: true,
            ..Default::default()
        }
    }

    #[test]
    fn home_is_a_single_publish() {
        let entry = entry(1);
        let host_plan = Plan::home().plan_for(&entry);
        assert_eq!(
            [Step::Publish(CommandDocument {
                print: PrintCommand::Home {
                    sequence_id: SequenceCounter::new().next_id(),
                },
            })],
            host_plan.steps(),
        );
    }

    #[test]
    fn calibrate_waits_then_publishes_calibration() {
        let entry = entry(1);
        let plan = Plan::calibrate(bed_leveling(), false, DELAY).unwrap();
        let steps: Vec<Step> = plan.plan_for(&entry).into_iter().collect();

        assert_eq!(3, steps.len());
        assert!(matches!(
            &steps[0],
            Step::Publish(CommandDocument {
                print: PrintCommand::Home { .. }
            }),
        ));
        assert_eq!(Step::Wait(DELAY), steps[1]);
        match &steps[2] {
            Step::Publish(CommandDocument {
                print:
                    PrintCommand::Calibration {
                        sequence_id,
                        option,
                    },
            }) => {
                assert_eq!(2, sequence_id.get());
                assert_eq!(OptionMask(2), *option);
            }
            step => panic!("expected calibration publish, got {step:?}"),
        }
    }

    #[test]
    fn home_only_skips_calibration() {
        let entry = entry(1);
        let plan = Plan::calibrate(bed_leveling(), true, DELAY).unwrap();
        assert_eq!(Plan::home().plan_for(&entry), plan.plan_for(&entry));
    }

    #[test]
    fn home_only_allows_empty_selection() {
        assert!(Plan::calibrate(CalibrationOptions::default(), true, DELAY).is_ok());
    }

    #[test]
    fn rejects_empty_selection() {
        assert_eq!(
            NothingToCalibrate,
            Plan::calibrate(CalibrationOptions::default(), false, DELAY).unwrap_err(),
        );
    }

    #[test]
    fn sequence_ids_restart_for_each_printer() {
        let (first, second) = (entry(1), entry(2));
        let plan = Plan::calibrate(bed_leveling(), false, DELAY).unwrap();
        assert_eq!(
            plan.plan_for(&first).steps(),
            plan.plan_for(&second).steps(),
        );
    }
}
