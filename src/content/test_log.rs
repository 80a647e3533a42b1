//! Test log content
//!
//! Unlike the admin documents, a test log chooses its own component,
//! procedure and date, and the filename is derived from those choices.

use chrono::NaiveDate;

use crate::content::{
    long_date, short_date, Approvals, ContentTree, DocumentKind, Table, BLANK_DATE,
};
use crate::core::catalog::{sanitize_filename, Theme};
use crate::core::context::GenerationContext;
use crate::core::layout::test_log_stem;
use crate::core::naming::generate_random_past_date;

const ENGINEERS: [&str; 5] = ["J. Smith", "A. Johnson", "R. Chen", "M. Rodriguez", "L. Williams"];

const EQUIPMENT: [(&str, &str); 10] = [
    ("Oscilloscope", "OSC"),
    ("Function Generator", "FG"),
    ("Data Acquisition System", "DAQ"),
    ("Thermocouple Reader", "TC"),
    ("Load Cell", "LC"),
    ("Pressure Transducer", "PT"),
    ("Accelerometer", "ACC"),
    ("Environmental Chamber", "EC"),
    ("Vibration Table", "VT"),
    ("Spectrum Analyzer", "SA"),
];

/// A generated test log with the choices that name its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestLog {
    pub component: String,
    pub procedure: String,
    pub date: NaiveDate,
    /// `TestLog_<component>_<procedure>_<YYYYMMDD>`, without extension
    pub stem: String,
    pub tree: ContentTree,
}

/// Which family of steps and result notes applies to a test type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Regime {
    Thermal,
    Vibration,
    Pressure,
    Generic,
}

impl Regime {
    fn of(test_type: &str) -> Self {
        let has = |words: &[&str]| words.iter().any(|w| test_type.contains(w));
        if has(&["Thermal", "Temperature"]) {
            Regime::Thermal
        } else if has(&["Vibration", "Shock"]) {
            Regime::Vibration
        } else if has(&["Pressure", "Leak"]) {
            Regime::Pressure
        } else {
            Regime::Generic
        }
    }
}

pub(crate) fn generate(ctx: &mut GenerationContext, test_type: &str, theme: &Theme) -> TestLog {
    let component = sanitize_filename(&ctx.pick(&theme.components));
    let procedure = sanitize_filename(&ctx.pick(&theme.test_procedures));
    let max_days = ctx.config().test_log_max_days_back;
    let date = generate_random_past_date(ctx, max_days);
    let stem = test_log_stem(&component, &procedure, date);
    let regime = Regime::of(test_type);

    let mut approvals = Approvals::new(
        "APPROVALS",
        ["Test Engineer", "Quality Assurance", "Engineering Manager"],
    );
    approvals.dates = Some(vec![
        short_date(date),
        BLANK_DATE.to_string(),
        BLANK_DATE.to_string(),
    ]);

    let mut tree = ContentTree::new(
        DocumentKind::TestLog,
        format!("TEST LOG: {}", procedure),
        date,
        Vec::new(),
        approvals,
    );

    let mut info = Table::new(["Field", "Value"]);
    for row in [
        ["Test ID:".to_string(), format!("TL-{}", ctx.range(10000, 99999))],
        ["Test Date:".to_string(), long_date(date)],
        ["Component:".to_string(), component.clone()],
        ["Project:".to_string(), theme.name.clone()],
        ["Test Type:".to_string(), test_type.to_string()],
        ["Test Procedure:".to_string(), procedure.clone()],
        ["Test Engineer:".to_string(), ctx.pick_str(&ENGINEERS)],
        ["Location:".to_string(), format!("Test Bay {}", ctx.range(1, 12))],
    ] {
        info.push_row(row);
    }
    tree.push_table("TEST INFORMATION", info);

    tree.push_lines("TEST SETUP", test_setup(ctx));
    tree.push_lines(
        "TEST PROCEDURE SUMMARY",
        procedure_summary(ctx, regime, &component, &procedure, test_type),
    );

    let (results, anomaly) = test_results(ctx, regime, &component, &procedure, theme);
    tree.push_lines("TEST RESULTS", results);

    let measurements = key_measurements(ctx, theme);
    let any_fail = measurements.rows.iter().any(|r| r[3] == "FAIL");
    tree.push_table("KEY MEASUREMENTS", measurements);

    let conclusion = if any_fail || anomaly {
        format!(
            "Based on the test results, the {} does not fully meet all requirements specified in {}. Additional engineering analysis is required to determine the root cause and necessary corrective actions.",
            component, procedure
        )
    } else {
        format!(
            "Based on the test results, the {} meets all requirements specified in {} and is acceptable for the intended application.",
            component, procedure
        )
    };
    tree.push_lines("CONCLUSION", vec![conclusion]);

    TestLog {
        component,
        procedure,
        date,
        stem,
        tree,
    }
}

fn test_setup(ctx: &mut GenerationContext) -> Vec<String> {
    let amount = ctx.count(2, 5);
    let mut lines = vec!["The following equipment was used in this test:".to_string()];
    for (name, tag) in ctx.sample(&EQUIPMENT, amount) {
        lines.push(format!("• {} (S/N: {}-{})", name, tag, ctx.range(10000, 99999)));
    }
    lines
}

fn procedure_summary(
    ctx: &mut GenerationContext,
    regime: Regime,
    component: &str,
    procedure: &str,
    test_type: &str,
) -> Vec<String> {
    let steps = match regime {
        Regime::Thermal => vec![
            "Install test article in environmental chamber".to_string(),
            format!("Attach {} thermocouples to critical locations", ctx.range(3, 8)),
            "Connect data acquisition system and verify sensor readings".to_string(),
            format!("Establish ambient baseline at {}°C for 30 minutes", ctx.range(20, 25)),
            format!(
                "Perform thermal cycling from {}°C to +{}°C",
                ctx.range(-65, -40),
                ctx.range(70, 125)
            ),
            "Record temperature data at 1-minute intervals".to_string(),
            "Return to ambient conditions and perform functional test".to_string(),
        ],
        Regime::Vibration => vec![
            "Mount test article to vibration fixture".to_string(),
            format!("Attach {} accelerometers to critical locations", ctx.range(3, 8)),
            "Perform pre-test functional check".to_string(),
            "Conduct low-level sine sweep for resonance search".to_string(),
            format!(
                "Apply random vibration profile at {} g RMS for {} minutes per axis",
                ctx.range(5, 15),
                ctx.range(1, 3)
            ),
            "Conduct post-test functional check".to_string(),
            "Repeat for remaining axes".to_string(),
        ],
        Regime::Pressure => vec![
            "Install test article in pressure test fixture".to_string(),
            "Connect pressure source and instrumentation".to_string(),
            "Perform initial leak check at low pressure".to_string(),
            format!(
                "Increase pressure to {} psi in {} increments",
                ctx.range(100, 500),
                ctx.range(3, 10)
            ),
            "Hold at maximum pressure for 30 minutes".to_string(),
            "Monitor for pressure decay".to_string(),
            "Depressurize and perform post-test inspection".to_string(),
        ],
        Regime::Generic => vec![
            "Install test article in test fixture".to_string(),
            "Connect test instrumentation and verify readings".to_string(),
            "Perform pre-test functional check".to_string(),
            format!("Apply test conditions per {}", procedure),
            "Record data at specified intervals".to_string(),
            "Return to ambient conditions".to_string(),
            "Perform post-test functional check".to_string(),
        ],
    };

    let mut lines = vec![format!(
        "This test was conducted in accordance with {} to verify the {}'s performance under {} conditions. The test sequence consisted of the following steps:",
        procedure, component, test_type
    )];
    lines.extend(steps.iter().enumerate().map(|(i, s)| format!("{}. {}", i + 1, s)));
    lines
}

/// Result prose, and whether an anomaly was reported
fn test_results(
    ctx: &mut GenerationContext,
    regime: Regime,
    component: &str,
    procedure: &str,
    theme: &Theme,
) -> (Vec<String>, bool) {
    if ctx.chance(0.8) {
        let mut text = format!(
            "The {} successfully completed all test requirements specified in {}. All measured parameters remained within acceptable limits throughout the test.",
            component, procedure
        );
        match regime {
            Regime::Thermal => text.push_str(&format!(
                " Maximum temperature deviation was {}°C from nominal.",
                ctx.range(1, 5)
            )),
            Regime::Vibration => text.push_str(&format!(
                " No resonances were detected within the {} to {} Hz range of interest.",
                ctx.range(10, 50),
                ctx.range(1000, 2000)
            )),
            Regime::Pressure => text.push_str(&format!(
                " Pressure decay rate was {:.3} psi/minute, below the {:.2} psi/minute requirement.",
                ctx.unit() * 0.5,
                ctx.unit() * 0.8 + 0.5
            )),
            Regime::Generic => {}
        }
        return (vec![text], false);
    }

    let anomaly = match ctx.range(0, 4) {
        0 => format!(
            "Temperature exceeded upper limit by {}°C during cycle {}",
            ctx.range(5, 15),
            ctx.range(3, 8)
        ),
        1 => format!(
            "Resonance detected at {} Hz with amplification factor of {}",
            ctx.range(50, 500),
            ctx.range(5, 20)
        ),
        2 => format!(
            "Pressure decay rate of {:.2} psi/minute exceeded the maximum allowable value",
            ctx.unit() * 0.5 + 0.8
        ),
        3 => format!(
            "Visual inspection revealed minor {}",
            ctx.pick_str(&["discoloration", "deformation", "surface irregularities"])
        ),
        _ => format!(
            "Measured {} deviated by {}% from expected value",
            ctx.pick(&theme.data_descriptions),
            ctx.range(5, 25)
        ),
    };
    let text = format!(
        "The {} exhibited an anomaly during testing. {}. A Notice of Deviation (NOD) has been generated to document this condition. Engineering assessment is required to determine impact on component qualification.",
        component, anomaly
    );
    (vec![text], true)
}

fn key_measurements(ctx: &mut GenerationContext, theme: &Theme) -> Table {
    let mut table = Table::new(["Parameter", "Requirement", "Measured", "Status"]);
    for _ in 0..ctx.count(3, 6) {
        let param = ctx.pick(&theme.data_descriptions);
        let (requirement, measured) = if param.contains("Temperature") {
            (
                format!("{}°C ± {}°C", ctx.range(-65, 150), ctx.range(2, 10)),
                format!("{}°C", ctx.range(-60, 145)),
            )
        } else if param.contains("Pressure") {
            (
                format!("{} psi ± {} psi", ctx.range(10, 1000), ctx.range(5, 50)),
                format!("{} psi", ctx.range(15, 990)),
            )
        } else if param.contains("Time") || param.contains("Rate") {
            (
                format!("< {} seconds", ctx.range(10, 60)),
                format!("{} seconds", ctx.range(5, 70)),
            )
        } else {
            (
                format!("{} ± {}%", ctx.range(80, 120), ctx.range(5, 20)),
                format!("{}%", ctx.range(75, 125)),
            )
        };
        let status = if ctx.chance(0.9) { "PASS" } else { "FAIL" };
        table.push_row([param, requirement, measured, status.to_string()]);
    }
    table
}
