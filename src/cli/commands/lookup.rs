//! `signup lookup` command - Query the reference data service

use clap::Subcommand;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::output::format_list;
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(Subcommand, Debug)]
pub enum LookupCommands {
    /// List international dial codes
    DialCodes,

    /// List countries
    Countries,

    /// List the cities of a country
    Cities {
        /// Country name, exactly as listed by `signup lookup countries`
        country: String,
    },
}

pub fn run(cmd: LookupCommands, global: &GlobalOpts) -> Result<()> {
    let config = global.config()?;
    let service = config.lookup_service();

    let output = match cmd {
        LookupCommands::DialCodes => {
            let codes = service.fetch_dial_codes()?;
            let items: Vec<&str> = codes.as_slice().iter().map(String::as_str).collect();
            format_list("Dial code", &items, global.format)?
        }
        LookupCommands::Countries => {
            let index = service.fetch_country_city_index()?;
            if global.format == OutputFormat::Md {
                let mut table = Builder::default();
                table.push_record(["Country", "Cities", "Examples"]);
                for country in index.countries() {
                    let cities = index.cities(country);
                    table.push_record([
                        country.to_string(),
                        cities.len().to_string(),
                        truncate_str(&cities.join(", "), 40),
                    ]);
                }
                table.build().with(Style::markdown()).to_string()
            } else {
                let items: Vec<&str> = index.countries().collect();
                format_list("Country", &items, global.format)?
            }
        }
        LookupCommands::Cities { country } => {
            let index = service.fetch_country_city_index()?;
            if !index.contains(&country) && !global.quiet {
                eprintln!("No cities known for {}", country);
            }
            let items: Vec<&str> = index.cities(&country).iter().map(String::as_str).collect();
            format_list("City", &items, global.format)?
        }
    };

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
