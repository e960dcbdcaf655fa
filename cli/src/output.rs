//! Output formatting

use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

impl OutputFormat {
    /// Single values have no tabular form; tables fall back to JSON
    pub fn render<T: Serialize>(&self, data: &T) -> anyhow::Result<String> {
        Ok(match self {
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
            OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(data)?,
        })
    }

    pub fn render_list<T, R, F>(&self, items: &[T], row: F) -> anyhow::Result<String>
    where
        T: Serialize,
        R: Tabled,
        F: Fn(&T) -> R,
    {
        match self {
            OutputFormat::Table => Ok(Table::new(items.iter().map(row))
                .with(Style::rounded())
                .to_string()),
            _ => self.render(&items),
        }
    }

    pub fn print<T: Serialize>(&self, data: &T) -> anyhow::Result<()> {
        println!("{}", self.render(data)?);
        Ok(())
    }

    pub fn print_list<T, R, F>(&self, items: &[T], row: F) -> anyhow::Result<()>
    where
        T: Serialize,
        R: Tabled,
        F: Fn(&T) -> R,
    {
        println!("{}", self.render_list(items, row)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        name: &'static str,
    }

    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "ID")]
        id: &'static str,
        #[tabled(rename = "Name")]
        name: &'static str,
    }

    fn row(item: &Item) -> Row {
        Row { id: item.id, name: item.name }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_list() {
        let items = [Item { id: "f1", name: "Landing" }];

        let table = OutputFormat::Table.render_list(&items, row).unwrap();
        assert!(table.contains("ID") && table.contains("Landing"));

        let json = OutputFormat::Json.render_list(&items, row).unwrap();
        assert!(json.contains("\"name\": \"Landing\""));

        let yaml = OutputFormat::Yaml.render_list(&items, row).unwrap();
        assert!(yaml.contains("- id: f1"));
    }
}
