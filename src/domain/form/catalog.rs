//! The pilot-training form catalog the portal ships with.

use crate::domain::form::{FieldKind, FieldSpec, FormConfig};

fn form(name: &str, table_name: &str, fields: Vec<FieldSpec>) -> FormConfig {
    FormConfig {
        name: name.to_string(),
        table_name: Some(table_name.to_string()),
        fields,
    }
}

fn text(name: &str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::ShortText)
}

fn textarea(name: &str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::LongText)
}

fn number(name: &str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Numeric)
}

fn dropdown(name: &str, label: &str, options: &[&str]) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::choice(options.iter().copied()))
}

fn date(name: &str, label: &str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Date)
}

pub fn pilot_training_forms() -> Vec<FormConfig> {
    vec![
        form(
            "EBT Modules Forms",
            "EbtModules",
            vec![
                number("ModuleNumber", "EBT Module Number"),
                dropdown(
                    "Competency",
                    "Key Competency Assessed",
                    &["Communication", "Leadership", "Situational Awareness"],
                ),
                number("PerformanceScore", "Performance Score (1-5)"),
            ],
        ),
        form(
            "Additional FSTD Forms",
            "AdditionalFstd",
            vec![
                text("DeviceID", "Simulator Device ID"),
                dropdown(
                    "Maneuver",
                    "Maneuver Practiced",
                    &["Engine Failure on Takeoff", "Go-Around", "Crosswind Landing"],
                ),
                dropdown(
                    "Outcome",
                    "Maneuver Outcome",
                    &["Successful", "Unstable Approach", "Requires Follow-up"],
                ),
            ],
        ),
        form(
            "Bespoke Additional FSTD Forms",
            "BespokeFstd",
            vec![
                text("ScenarioName", "Bespoke Scenario Name"),
                textarea("TrainingObjective", "Primary Training Objective"),
                textarea("PilotFeedback", "Pilot Subjective Feedback"),
            ],
        ),
        form(
            "Out of Phase Assessment Forms",
            "OutOfPhaseAssessment",
            vec![
                dropdown(
                    "AssessmentReason",
                    "Reason for Assessment",
                    &["Post-Incident", "Performance Decline", "Return to Work"],
                ),
                text("AssessorName", "Assessor Name"),
                textarea("FinalRecommendation", "Final Recommendation"),
            ],
        ),
        form(
            "Line Event Forms",
            "LineEvents",
            vec![
                text("FlightNumber", "Flight Number"),
                text("DepartureAirport", "Departure Airport (IATA)"),
                textarea("EventObserved", "Observed Event Description"),
            ],
        ),
        form(
            "EBT-I AOC Forms",
            "EbtiAoc",
            vec![
                text("AocReference", "AOC Reference Number"),
                dropdown("IsConfirmed", "EBT Manager Acknowledged", &["Yes", "No"]),
                date("ConfirmationDate", "Date of Acknowledgement"),
            ],
        ),
        form(
            "Technical Ground Training Forms",
            "GroundTraining",
            vec![
                text("CourseTitle", "Course Title"),
                number("AssessmentScore", "Assessment Score (%)"),
                textarea("InstructorFeedback", "Instructor Feedback"),
            ],
        ),
        form(
            "Appendix 10 Forms",
            "Appendix10",
            vec![
                number("FlightHours", "Total Flight Hours"),
                text("AircraftType", "Aircraft Type"),
                text("EndorsementSought", "Endorsement Sought"),
            ],
        ),
        form(
            "Command Upgrade Forms",
            "CommandUpgrade",
            vec![
                number("YearsAsFirstOfficer", "Years as First Officer"),
                text("CheckCaptain", "Check Captain Name"),
                dropdown(
                    "UpgradeReadiness",
                    "Upgrade Readiness Assessment",
                    &["Ready", "Not Ready", "Requires More Training"],
                ),
            ],
        ),
    ]
}
