//! Template filters and globals available to page and shortcode templates.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use minijinja::value::{Kwargs, ValueKind};
use minijinja::{Environment, Error, ErrorKind, State, Value};

use crate::assets::{AssetRegistry, ScriptOptions};
use crate::context::render_if_exists;
use crate::http::JsonClient;
use crate::readmore::{ReadMore, ReadMoreLink, ReadMoreOptions};

/// Default `shorten` length.
const DEFAULT_SHORTEN_LENGTH: usize = 255;
/// Characters a text may exceed the length by before it is shortened.
const DEFAULT_SHORTEN_LEEWAY: usize = 5;

/// Shared state captured by the filters.
#[derive(Clone)]
pub(crate) struct Filters {
    pub(crate) readmore: Arc<ReadMore>,
    pub(crate) assets: Arc<AssetRegistry>,
    pub(crate) actions: Arc<HashMap<String, String>>,
    pub(crate) http: JsonClient,
}

impl Filters {
    /// Register every filter and global on `env`.
    pub(crate) fn register(&self, env: &mut Environment<'static>) {
        env.add_filter("mergedict", mergedict);
        env.add_filter("page_slugs", page_slugs);
        env.add_filter("split", split);
        env.add_filter("tostyles", tostyles);
        env.add_filter("shorten", shorten);

        let readmore = Arc::clone(&self.readmore);
        env.add_filter("readmore", move |post: Value, kwargs: Kwargs| {
            readmore_filter(&readmore, &post, &kwargs)
        });

        let assets = Arc::clone(&self.assets);
        env.add_filter(
            "add_script",
            move |record: Value, src: String, kwargs: Kwargs| -> Result<String, Error> {
                let options = script_options(&kwargs)?;
                if let Some(key) = record_key(&record)? {
                    assets.add_script(&key, &src, options);
                }
                Ok(String::new())
            },
        );

        let assets = Arc::clone(&self.assets);
        env.add_filter(
            "gen_js",
            move |state: &State, record: Value| -> Result<Value, Error> {
                let Some(key) = record_key(&record)? else {
                    return Ok(Value::from(""));
                };
                let html = assets.gen_js(&key, |name| render_if_exists(state.env(), name))?;
                Ok(Value::from_safe_string(html))
            },
        );

        let actions = Arc::clone(&self.actions);
        env.add_filter("action_url", move |action: String| -> String {
            actions.get(&action).cloned().unwrap_or(action)
        });

        let http = self.http.clone();
        env.add_function(
            "json_request",
            move |url: String, params: Option<Value>| -> Result<Value, Error> {
                let params = match params {
                    Some(params) => string_pairs(&params)?,
                    None => Vec::new(),
                };
                let json = http.get_json(&url, &params).map_err(|err| {
                    Error::new(ErrorKind::InvalidOperation, format!("json_request to {url} failed"))
                        .with_source(err)
                })?;
                Ok(Value::from_serialize(&json))
            },
        );
    }
}

/// Record key from a record value (its `path`) or a plain path string.
///
/// Returns `None` for an undefined or none record.
fn record_key(record: &Value) -> Result<Option<String>, Error> {
    if record.is_undefined() || record.is_none() {
        return Ok(None);
    }
    if let Some(path) = record.as_str() {
        return Ok(Some(path.to_owned()));
    }
    match record.get_attr("path")?.as_str() {
        Some(path) => Ok(Some(path.to_owned())),
        None => Err(Error::new(
            ErrorKind::InvalidOperation,
            "record has no path attribute",
        )),
    }
}

/// Key/value pairs of a map, in iteration order.
fn entries(map: &Value) -> Result<Vec<(String, Value)>, Error> {
    if map.kind() != ValueKind::Map {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("expected a map, got {}", map.kind()),
        ));
    }
    map.try_iter()?
        .map(|key| {
            let value = map.get_item(&key)?;
            let key = key.as_str().map_or_else(|| key.to_string(), str::to_owned);
            Ok((key, value))
        })
        .collect()
}

fn string_pairs(map: &Value) -> Result<Vec<(String, String)>, Error> {
    Ok(entries(map)?
        .into_iter()
        .map(|(key, value)| {
            let value = value.as_str().map_or_else(|| value.to_string(), str::to_owned);
            (key, value)
        })
        .collect())
}

/// Mark every keyword argument as used, returning their names.
fn consume_all(kwargs: &Kwargs) -> Result<Vec<(String, Value)>, Error> {
    let keys: Vec<String> = kwargs.args().map(str::to_owned).collect();
    keys.into_iter()
        .map(|key| {
            let value: Value = kwargs.get(&key)?;
            Ok((key, value))
        })
        .collect()
}

/// `d|mergedict(a=1)`: a copy of `d` with the keyword arguments set.
fn mergedict(base: Value, kwargs: Kwargs) -> Result<Value, Error> {
    let mut merged: IndexMap<String, Value> = entries(&base)?.into_iter().collect();
    merged.extend(consume_all(&kwargs)?);
    Ok(Value::from_serialize(&merged))
}

/// URL segments of a record: `[slug]`, or `[base, "page", n]` for a
/// paginated record such as `/blog@2`.
fn page_slugs(record: Value) -> Result<Vec<String>, Error> {
    let path = record.get_attr("path")?;
    let path = path.as_str().unwrap_or_default();
    match path.rsplit_once('@') {
        Some((base, page)) => Ok(vec![
            base.trim_start_matches('/').to_owned(),
            "page".to_owned(),
            page.to_owned(),
        ]),
        None => {
            let slug = record.get_attr("slug")?;
            Ok(vec![slug.as_str().unwrap_or_default().to_owned()])
        }
    }
}

/// `s|split(sep)`: split on `sep`, or on whitespace runs without one.
fn split(text: Option<String>, sep: Option<String>) -> Vec<String> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Vec::new();
    };
    match sep {
        Some(sep) if !sep.is_empty() => text.split(sep.as_str()).map(str::to_owned).collect(),
        _ => text.split_whitespace().map(str::to_owned).collect(),
    }
}

/// `{'font_size': '12px'}|tostyles` -> `font-size:12px`.
fn tostyles(styles: Value) -> Result<String, Error> {
    let styles: IndexMap<String, sc_renderer::Value> = entries(&styles)?
        .into_iter()
        .map(|(key, value)| {
            let value = value.as_str().map_or_else(|| value.to_string(), str::to_owned);
            (key, sc_renderer::Value::from(value))
        })
        .collect();
    Ok(sc_renderer::tostyles(&styles))
}

/// `text|shorten(length, killwords=false, end="...", leeway=5)`.
fn shorten(text: String, length: Option<usize>, kwargs: Kwargs) -> Result<String, Error> {
    let killwords: Option<bool> = kwargs.get("killwords")?;
    let end: Option<String> = kwargs.get("end")?;
    let leeway: Option<usize> = kwargs.get("leeway")?;
    kwargs.assert_all_used()?;

    let end = end.as_deref().unwrap_or("...");
    let length = length.unwrap_or(DEFAULT_SHORTEN_LENGTH);
    if length < end.chars().count() {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            "shorten length must not be shorter than the end marker",
        ));
    }
    Ok(truncate(
        &text,
        length,
        killwords.unwrap_or(false),
        end,
        leeway.unwrap_or(DEFAULT_SHORTEN_LEEWAY),
    ))
}

/// Shorten `text` to at most `length` characters including `end`.
///
/// Texts within `length + leeway` characters are returned unchanged.
/// Unless `killwords` is set the cut falls on the last space before the
/// limit.
pub fn truncate(text: &str, length: usize, killwords: bool, end: &str, leeway: usize) -> String {
    if text.chars().count() <= length + leeway {
        return text.to_owned();
    }
    let keep = length.saturating_sub(end.chars().count());
    let cut = text.char_indices().nth(keep).map_or(text.len(), |(i, _)| i);
    let head = &text[..cut];
    let head = if killwords {
        head
    } else {
        head.rsplit_once(' ').map_or(head, |(before, _)| before)
    };
    format!("{head}{end}")
}

fn readmore_filter(readmore: &ReadMore, post: &Value, kwargs: &Kwargs) -> Result<Value, Error> {
    let key: Option<String> = kwargs.get("key")?;
    let link: Option<Value> = kwargs.get("link")?;
    let split: Option<String> = kwargs.get("split")?;
    kwargs.assert_all_used()?;

    let key = key.as_deref().unwrap_or("body");
    let body = post.get_attr(key)?;
    let Some(body) = body.as_str() else {
        return Ok(post.clone());
    };
    let url_path = post.get_attr("url_path")?;
    let url_path = url_path.as_str().unwrap_or_default();

    let link = match link {
        None => ReadMoreLink::Default,
        Some(link) if link.kind() == ValueKind::Bool => {
            if link.is_true() {
                ReadMoreLink::Default
            } else {
                ReadMoreLink::Hidden
            }
        }
        Some(link) => match link.as_str() {
            Some(text) => ReadMoreLink::Custom(text.to_owned()),
            None => ReadMoreLink::Default,
        },
    };
    let options = ReadMoreOptions { link, split };

    let Some(parts) = readmore.process(body, url_path, &options) else {
        return Ok(post.clone());
    };
    let mut fields: IndexMap<String, Value> = entries(post)?.into_iter().collect();
    fields.insert(format!("{key}_short"), Value::from(parts.short));
    fields.insert(key.to_owned(), Value::from(parts.full));
    Ok(Value::from_serialize(&fields))
}

fn script_options(kwargs: &Kwargs) -> Result<ScriptOptions, Error> {
    let defaults = ScriptOptions::default();
    let flag = |name: &str, default: bool| -> Result<bool, Error> {
        Ok(kwargs.get::<Option<bool>>(name)?.unwrap_or(default))
    };
    let options = ScriptOptions {
        embed: flag("embed", defaults.embed)?,
        template: flag("template", defaults.template)?,
        jquery: flag("jquery", defaults.jquery)?,
        css: flag("css", defaults.css)?,
        is_async: flag("async", defaults.is_async)?,
    };
    // Unknown options are accepted and ignored.
    consume_all(kwargs)?;
    Ok(options)
}
