use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, Select, Text};
use std::fmt::Display;
use std::str::FromStr;

pub struct InquireDriver;

/// Validator accepting values inside the optional bounds.
fn bounded<T>(min: Option<T>, max: Option<T>) -> impl Fn(&T) -> Result<Validation, inquire::CustomUserError> + Clone
where
    T: PartialOrd + Display + Copy + Send + Sync + 'static,
{
    move |x: &T| {
        let msg = match (min, max) {
            (Some(lo), Some(hi)) if *x < lo || *x > hi => format!("Must be between {lo} and {hi}"),
            (Some(lo), None) if *x < lo => format!("Must be ≥ {lo}"),
            (None, Some(hi)) if *x > hi => format!("Must be ≤ {hi}"),
            _ => return Ok(Validation::Valid),
        };
        Ok(Validation::Invalid(msg.into()))
    }
}

fn ask_number<T>(title: &str, help: &str, default: T, min: Option<T>, max: Option<T>) -> Result<T>
where
    T: FromStr + ToString + PartialOrd + Display + Copy + Clone + Send + Sync + 'static,
{
    Ok(CustomType::<T>::new(title)
        .with_default(default)
        .with_help_message(help)
        .with_error_message("Please type a number")
        .with_validator(bounded(min, max))
        .prompt()?)
}

impl PromptDriver for InquireDriver {
    fn select(&self, title: &str, help: Option<&str>, options: &[String]) -> Result<usize> {
        let mut select = Select::new(title, options.to_vec());
        if let Some(help) = help {
            select = select.with_help_message(help);
        }
        Ok(select.raw_prompt()?.index)
    }

    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        ask_number(title, help, default, min, max)
    }

    fn ask_f64(
        &self,
        title: &str,
        help: &str,
        default: f64,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<f64> {
        ask_number(title, help, default, min, max)
    }
}
