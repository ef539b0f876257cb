//! Interactive monitor setup on the terminal

use std::io::{self, BufRead, Write};
use wxmon_core::{Attribute, TemperatureUnit, Threshold, TriggerRule, UnitError, WeatherMonitor};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Input closed while waiting for {0}")]
    Eof(&'static str),

    #[error("City must not be empty")]
    EmptyCity,

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// Everything needed to build a [`WeatherMonitor`]
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSetup {
    pub city: String,
    pub unit: TemperatureUnit,
    pub triggers: Vec<TriggerRule>,
}

impl MonitorSetup {
    pub fn into_monitor(self) -> WeatherMonitor {
        let mut monitor = WeatherMonitor::new(self.city, self.unit);
        for rule in self.triggers {
            monitor.add_trigger(rule.attribute, rule.operator, rule.threshold);
        }
        monitor
    }
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    what: &'static str,
) -> Result<String, PromptError> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Eof(what));
    }
    Ok(line.trim().to_string())
}

fn confirmed(answer: &str) -> bool {
    answer.eq_ignore_ascii_case("y")
}

/// Ask for city, unit and optional temperature / condition triggers
///
/// A configured `unit` is used as-is and not asked for. An invalid unit
/// aborts the setup before any monitor exists.
pub fn ask_setup<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    unit: Option<TemperatureUnit>,
) -> Result<MonitorSetup, PromptError> {
    let city = ask(input, output, "Please enter your city: ", "city")?;
    if city.is_empty() {
        return Err(PromptError::EmptyCity);
    }

    let unit: TemperatureUnit = match unit {
        Some(unit) => unit,
        None => ask(
            input,
            output,
            "Enter temperature type (celsius/fahrenheit): ",
            "temperature type",
        )?
        .parse()?,
    };

    let mut triggers = Vec::new();

    let answer = ask(
        input,
        output,
        "Do you want to add a temperature trigger: (Y/N) ",
        "temperature trigger answer",
    )?;
    if confirmed(&answer) {
        let operator = ask(input, output, "Enter Operator: ", "operator")?;
        let threshold = ask(input, output, "Enter Threshold: ", "threshold")?;
        triggers.push(TriggerRule::new(
            Attribute::Temperature,
            operator.as_str(),
            Threshold::parse(&threshold),
        ));
    }

    let answer = ask(
        input,
        output,
        "Do you want to add a weather condition trigger: (Y/N) ",
        "condition trigger answer",
    )?;
    if confirmed(&answer) {
        let operator = ask(input, output, "Enter Operator: ", "operator")?;
        let condition = ask(input, output, "Enter condition: ", "condition")?;
        triggers.push(TriggerRule::new(
            Attribute::Condition,
            operator.as_str(),
            Threshold::Text(condition),
        ));
    }

    Ok(MonitorSetup {
        city,
        unit,
        triggers,
    })
}

/// Run [`ask_setup`] against the process terminal
pub fn ask_on_terminal(unit: Option<TemperatureUnit>) -> Result<MonitorSetup, PromptError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    ask_setup(&mut input, &mut output, unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wxmon_core::Operator;

    fn run_with_unit(
        script: &str,
        unit: Option<TemperatureUnit>,
    ) -> (Result<MonitorSetup, PromptError>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = ask_setup(&mut input, &mut output, unit);
        (result, String::from_utf8(output).unwrap())
    }

    fn run(script: &str) -> (Result<MonitorSetup, PromptError>, String) {
        run_with_unit(script, None)
    }

    #[test]
    fn test_full_setup_with_both_triggers() {
        let (result, transcript) = run("Chennai\nCelsius\nY\n>\n35\ny\n==\nRain\n");
        let setup = result.unwrap();

        assert_eq!(setup.city, "Chennai");
        assert_eq!(setup.unit, TemperatureUnit::Celsius);
        assert_eq!(
            setup.triggers,
            vec![
                TriggerRule::new(Attribute::Temperature, Operator::Gt, 35.0),
                TriggerRule::new(Attribute::Condition, Operator::Eq, "Rain"),
            ]
        );
        assert!(transcript.starts_with("Please enter your city: "));
        assert!(transcript.contains("Enter condition: "));
    }

    #[test]
    fn test_setup_without_triggers() {
        let (result, _) = run("Reykjavik\nfahrenheit\nN\nN\n");
        let monitor = result.unwrap().into_monitor();

        assert_eq!(monitor.city(), "Reykjavik");
        assert_eq!(monitor.unit(), TemperatureUnit::Fahrenheit);
        assert!(monitor.triggers().is_empty());
    }

    #[test]
    fn test_invalid_unit_aborts() {
        let (result, transcript) = run("Lagos\nrankine\nY\n>\n30\n");

        assert!(matches!(result, Err(PromptError::Unit(_))));
        assert!(!transcript.contains("trigger"));
    }

    #[test]
    fn test_closed_input() {
        let (result, _) = run("Lagos\n");
        assert!(matches!(result, Err(PromptError::Eof("temperature type"))));
    }

    #[test]
    fn test_configured_unit_is_not_asked() {
        let (result, transcript) =
            run_with_unit("Oslo\nY\n<\n-5\nN\n", Some(TemperatureUnit::Fahrenheit));
        let setup = result.unwrap();

        assert_eq!(setup.city, "Oslo");
        assert_eq!(setup.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(
            setup.triggers,
            vec![TriggerRule::new(Attribute::Temperature, Operator::Lt, -5.0)]
        );
        assert!(!transcript.contains("Enter temperature type"));
    }

    #[test]
    fn test_empty_city_rejected() {
        let (result, _) = run("\ncelsius\n");
        assert!(matches!(result, Err(PromptError::EmptyCity)));
    }
}
