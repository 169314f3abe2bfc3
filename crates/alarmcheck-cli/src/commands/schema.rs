//! Schema command - print the alarm schema.

use alarmcheck::alarm_schema;
use colored::Colorize;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Alarm schema:".yellow().bold());

    for column in alarm_schema().columns() {
        let required = if column.nullable { "nullable" } else { "required" };
        println!(
            "  {:12} {:8} {}",
            column.name.white().bold(),
            column.column_type.label(),
            required
        );

        if let Some(coercion) = &column.coercion {
            println!(
                "    {} {}",
                "accepts".cyan(),
                coercion.accepted.join(" | ")
            );
        }
        for check in &column.checks {
            println!("    {} {}", "check".cyan(), check.describe());
        }
    }

    Ok(())
}
