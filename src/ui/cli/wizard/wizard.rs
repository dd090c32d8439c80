use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::choices::{FieldKind, FieldSpec, PathRule, UIChoice, specs_for_kind};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

fn kind_items<K>() -> Vec<(K, String)>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let text = match k.get_detailed_message() {
                Some(desc) if !desc.is_empty() => format!("{label}  {DIM_ITALIC}{desc}{RESET}"),
                _ => label.to_string(),
            };
            (k, text)
        })
        .collect()
}

/// Asks for a kind, then for every field of its parameters, and builds the
/// typed choice.
pub fn prompt_choice<C: UIChoice, D: PromptDriver>(driver: &D) -> Result<C> {
    let items = kind_items::<C::Kind>();
    let texts: Vec<String> = items.iter().map(|(_, text)| text.clone()).collect();
    let index = driver.select(C::prompt_label(), C::prompt_help(), &texts)?;
    let (kind, _) = items.get(index).context("selection out of range")?;
    let kind = *kind;

    let key: &'static str = kind.into();
    let specs = specs_for_kind(&C::schema(), key)?;
    let defaults = C::default_params(kind);

    let mut params = Map::new();
    for s in specs {
        let init = s.default.clone().or_else(|| defaults.get(&s.name).cloned());
        if let Some(val) = ask_field(driver, &s, init)? {
            params.insert(s.name.clone(), val);
        }
    }
    C::from_parts(kind, Value::Object(params))
}

fn ask_field<D: PromptDriver>(driver: &D, s: &FieldSpec, init: Option<Value>) -> Result<Option<Value>> {
    let help = s.description.as_deref().unwrap_or("");

    let is_optional_numeric = s.nullable && matches!(s.kind, FieldKind::Integer | FieldKind::Number);
    if is_optional_numeric {
        return ask_optional_number(driver, s, help, init);
    }

    let value = match s.kind {
        FieldKind::Boolean => {
            let def = init.and_then(|v| v.as_bool()).unwrap_or(false);
            Value::Bool(driver.ask_bool(&s.title, help, def)?)
        }
        FieldKind::String => {
            let def = init
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            let answer = match &s.path {
                Some(rule) => prompt_until_ok(driver, &s.title, help, &def, |a| {
                    validate_path_str(a, rule)
                })?,
                None => driver.ask_string(&s.title, help, &def)?,
            };
            Value::String(answer.trim().to_string())
        }
        FieldKind::StringList => {
            let def = init
                .as_ref()
                .and_then(|v| v.as_array())
                .map(|a| a.iter().filter_map(|v| v.as_str()).collect::<Vec<_>>().join(", "))
                .unwrap_or_default();
            let answer = prompt_until_ok(driver, &s.title, help, &def, |a| {
                let items = split_list(a);
                if items.is_empty() {
                    return Err("Type at least one value".into());
                }
                match &s.path {
                    Some(rule) => items.iter().try_for_each(|i| validate_path_str(i, rule)),
                    None => Ok(()),
                }
            })?;
            Value::from(split_list(&answer))
        }
        FieldKind::Integer => {
            let def = init.and_then(|v| v.as_u64()).unwrap_or(0);
            Value::from(driver.ask_u64(
                &s.title,
                help,
                def,
                s.min.map(|x| x as u64),
                s.max.map(|x| x as u64),
            )?)
        }
        FieldKind::Number => {
            let def = init.and_then(|v| v.as_f64()).unwrap_or(0.0);
            Value::from(driver.ask_f64(&s.title, help, def, s.min, s.max)?)
        }
    };
    Ok(Some(value))
}

fn ask_optional_number<D: PromptDriver>(
    driver: &D,
    s: &FieldSpec,
    help: &str,
    init: Option<Value>,
) -> Result<Option<Value>> {
    let def_txt = init
        .as_ref()
        .filter(|v| !v.is_null())
        .map(Value::to_string)
        .unwrap_or_default();

    let answer = driver.ask_string(&s.title, &format!("{help}\n(leave blank for none)"), &def_txt)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(Some(Value::Null));
    }
    let value = match s.kind {
        FieldKind::Integer => Value::from(
            answer
                .parse::<u64>()
                .with_context(|| format!("invalid integer for {}", s.title))?,
        ),
        _ => Value::from(
            answer
                .parse::<f64>()
                .with_context(|| format!("invalid number for {}", s.title))?,
        ),
    };
    Ok(Some(value))
}

fn split_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_path_str(input: &str, rule: &PathRule) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Path cannot be empty".into());
    }
    let p = Path::new(trimmed);

    if rule.must_exist && !p.exists() {
        return Err(format!("Path does not exist: {}", p.display()));
    }
    if rule.must_be_file && p.exists() && !p.is_file() {
        return Err("Expected a file path, not a directory".into());
    }
    if rule.must_be_dir && p.exists() && !p.is_dir() {
        return Err("Expected a directory".into());
    }
    if !rule.extensions.is_empty() && !p.is_dir() {
        match p.extension().and_then(|e| e.to_str()) {
            Some(ext) if rule.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) => {}
            _ => return Err(format!("Expected a .{} file", rule.extensions.join(" / ."))),
        }
    }
    Ok(())
}

fn prompt_until_ok<D, V>(driver: &D, title: &str, help: &str, default: &str, validate: V) -> Result<String>
where
    D: PromptDriver,
    V: Fn(&str) -> Result<(), String>,
{
    loop {
        let answer = driver.ask_string(title, help, default)?;
        match validate(&answer) {
            Ok(()) => return Ok(answer),
            Err(msg) => eprintln!("✗ {msg}"),
        }
    }
}
