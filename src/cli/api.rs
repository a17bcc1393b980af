//
//  gh-actions-client
//  cli/api.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Direct API access command
//!
//! This command sends one request through the dispatcher, so it gets the
//! same authentication, media types and pagination as the library.
//!
//! ## Examples
//!
//! ```bash
//! # Get repository info
//! gha api repos/octocat/hello-world
//!
//! # Comment on an issue
//! gha api -X POST repos/octocat/hello-world/issues/7/comments -F body="Thanks!"
//!
//! # Walk every page of a listing
//! gha api users/octocat/repos --paginate
//!
//! # GraphQL: `query` is the document, every other field a variable
//! gha api graphql -F query='query($login: String!) {user(login: $login) {id}}' -F login=octocat
//! ```

use std::fs;
use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Args;
use console::style;
use serde_json::{Map, Value};

use crate::api::common::{MediaType, PageRange, RawResponse, Request};

use super::GlobalOptions;

/// Endpoint name that switches to a GraphQL request.
const GRAPHQL_ENDPOINT: &str = "graphql";

/// Make direct API requests
#[derive(Args, Debug)]
pub struct ApiCommand {
    /// API endpoint relative to the base URL (e.g., repos/OWNER/REPO)
    pub endpoint: String,

    /// HTTP method (defaults to GET, or POST when a body is given)
    #[arg(long, short = 'X')]
    pub method: Option<String>,

    /// Request body fields as JSON (key=value, can be nested with dots)
    #[arg(long, short = 'F', action = clap::ArgAction::Append)]
    pub field: Vec<String>,

    /// Raw field values (not JSON-encoded, strings only)
    #[arg(long, action = clap::ArgAction::Append)]
    pub raw_field: Vec<String>,

    /// Read request body from file (- for stdin)
    #[arg(long, short = 'f')]
    pub input: Option<String>,

    /// Paginate through all results
    #[arg(long)]
    pub paginate: bool,

    /// Enable an API preview (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub preview: Vec<String>,

    /// Accept header, as a media type name (raw, diff, ...) or verbatim
    #[arg(long)]
    pub accept: Option<String>,

    /// Include response headers in output
    #[arg(long, short = 'i')]
    pub include: bool,

    /// Suppress output (only fail on errors)
    #[arg(long)]
    pub silent: bool,
}

impl ApiCommand {
    pub fn run(&self, global: &GlobalOptions) -> Result<()> {
        let client = global.github_client()?;
        let endpoint = self.endpoint.trim_start_matches('/');
        let body = self.build_body()?;

        if endpoint == GRAPHQL_ENDPOINT {
            let (query, variables) = split_graphql_body(body)?;
            let previews: Vec<&str> = self.preview.iter().map(String::as_str).collect();
            let document = client.graphql(&query, variables, &previews)?;
            return self.print_json(&document, global);
        }

        let request = self.build_request(body);

        if self.paginate {
            let mut items = Vec::new();
            for page in client.request_pages(endpoint, request, PageRange::all())? {
                let page = page?;
                match page.json::<Value>()? {
                    Value::Array(chunk) => items.extend(chunk),
                    other => items.push(other),
                }
            }
            return self.print_json(&Value::Array(items), global);
        }

        let response = client.request(endpoint, request)?;
        self.print_response(&response, global)
    }

    fn build_request(&self, body: Option<Value>) -> Request {
        let mut request = Request::new();
        if let Some(method) = &self.method {
            request = request.method(method.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        for preview in &self.preview {
            request = request.preview(preview.as_str());
        }
        if let Some(accept) = &self.accept {
            request = match accept.parse::<MediaType>() {
                Ok(media) => request.accept(media),
                Err(_) => request.accept(accept.as_str()),
            };
        }
        request
    }

    fn build_body(&self) -> Result<Option<Value>> {
        // If input file is specified, read from it
        if let Some(input) = &self.input {
            let content = if input == "-" {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
            };

            let value: Value = serde_json::from_str(&content)?;
            return Ok(Some(value));
        }

        if self.field.is_empty() && self.raw_field.is_empty() {
            return Ok(None);
        }

        let mut body = Map::new();

        for field in &self.field {
            let (key, raw) = split_field(field)?;
            set_nested_value(&mut body, key, parse_field_value(raw));
        }

        for field in &self.raw_field {
            let (key, raw) = split_field(field)?;
            set_nested_value(&mut body, key, Value::String(raw.to_string()));
        }

        Ok(Some(Value::Object(body)))
    }

    fn print_response(&self, response: &RawResponse, global: &GlobalOptions) -> Result<()> {
        if self.include {
            println!("{} {}", style("HTTP").dim(), response.status);
            for (name, value) in response.headers.iter() {
                println!("{}: {}", name, value.to_str().unwrap_or(""));
            }
            println!();
        }

        if self.silent {
            return Ok(());
        }

        match serde_json::from_slice::<Value>(&response.body) {
            Ok(json) => self.print_json(&json, global),
            Err(_) => {
                println!("{}", response.text());
                Ok(())
            }
        }
    }

    fn print_json(&self, value: &Value, global: &GlobalOptions) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        if global.json {
            println!("{}", value);
        } else {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        Ok(())
    }
}

fn split_field(field: &str) -> Result<(&str, &str)> {
    match field.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Invalid field format: {}. Expected key=value", field),
    }
}

/// Interprets a `-F` value: literals, numbers and JSON documents are typed,
/// anything else stays a string.
fn parse_field_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                Value::Number(n.into())
            } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                Value::Number(n)
            } else if raw.starts_with('[') || raw.starts_with('{') {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            } else {
                Value::String(raw.to_string())
            }
        }
    }
}

fn set_nested_value(obj: &mut Map<String, Value>, key: &str, value: Value) {
    match key.split_once('.') {
        None => {
            obj.insert(key.to_string(), value);
        }
        Some((first, rest)) => {
            let entry = obj
                .entry(first.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(nested) = entry {
                set_nested_value(nested, rest, value);
            }
        }
    }
}

/// Splits a GraphQL request body into the document and its variables.
fn split_graphql_body(body: Option<Value>) -> Result<(String, Value)> {
    let Some(Value::Object(mut fields)) = body else {
        bail!("GraphQL requests need a query field (-F query=...)");
    };
    let query = match fields.remove("query") {
        Some(Value::String(query)) => query,
        _ => bail!("GraphQL requests need a query field (-F query=...)"),
    };
    let variables = match fields.remove("variables") {
        Some(variables) if fields.is_empty() => variables,
        Some(_) => bail!("Pass GraphQL variables either as fields or as a variables object, not both"),
        None => Value::Object(fields),
    };
    Ok((query, variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_field_value() {
        assert_eq!(parse_field_value("true"), json!(true));
        assert_eq!(parse_field_value("42"), json!(42));
        assert_eq!(parse_field_value("[1,2]"), json!([1, 2]));
        assert_eq!(parse_field_value("hello"), json!("hello"));
    }

    #[test]
    fn test_nested_fields() {
        let mut body = Map::new();
        set_nested_value(&mut body, "source.branch", json!("main"));
        set_nested_value(&mut body, "source.path", json!("/docs"));
        set_nested_value(&mut body, "build_type", json!("legacy"));
        assert_eq!(
            Value::Object(body),
            json!({"source": {"branch": "main", "path": "/docs"}, "build_type": "legacy"})
        );
    }

    #[test]
    fn test_split_field_requires_equals() {
        assert!(split_field("body").is_err());
        assert!(split_field("=x").is_err());
        assert_eq!(split_field("a=b=c").unwrap(), ("a", "b=c"));
    }

    #[test]
    fn test_split_graphql_body() {
        let (query, variables) =
            split_graphql_body(Some(json!({"query": "{viewer{login}}", "n": 3}))).unwrap();
        assert_eq!(query, "{viewer{login}}");
        assert_eq!(variables, json!({"n": 3}));

        assert!(split_graphql_body(None).is_err());
        assert!(split_graphql_body(Some(json!({"n": 3}))).is_err());
    }
}
