// src/plist.rs

//! XML property-list parsing
//!
//! Parses the plist subset bundles actually use (dict, array, string,
//! integer, real, true/false, data, date) into a `serde_json::Value` so
//! the rest of the harness can treat bundle metadata like any other
//! comparable document. No write path; verification only reads.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::{Map, Value};

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parse an XML property list into its JSON-equivalent value.
pub fn parse(text: &str) -> Result<Value> {
    let mut reader = Reader::from_reader(text.as_bytes());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"plist" => {
                let value = next_value(&mut reader)?
                    .ok_or_else(|| Error::Plist("empty <plist> document".into()))?;
                return Ok(value);
            }
            Event::Eof => return Err(Error::Plist("missing <plist> root element".into())),
            _ => {}
        }
    }
}

fn xml_err(e: quick_xml::Error) -> Error {
    Error::Plist(e.to_string())
}

/// Read the next value element, or `None` when the enclosing container ends.
fn next_value(reader: &mut XmlReader<'_>) -> Result<Option<Value>> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) => {
                let tag = e.name().as_ref().to_vec();
                let value = match tag.as_slice() {
                    b"dict" => parse_dict(reader)?,
                    b"array" => parse_array(reader)?,
                    b"string" | b"data" | b"date" => Value::String(read_text(reader)?),
                    b"integer" => {
                        let text = read_text(reader)?;
                        let n: i64 = text
                            .trim()
                            .parse()
                            .map_err(|_| Error::Plist(format!("bad integer: {text}")))?;
                        Value::from(n)
                    }
                    b"real" => {
                        let text = read_text(reader)?;
                        let n: f64 = text
                            .trim()
                            .parse()
                            .map_err(|_| Error::Plist(format!("bad real: {text}")))?;
                        Value::from(n)
                    }
                    other => {
                        return Err(Error::Plist(format!(
                            "unexpected element <{}>",
                            String::from_utf8_lossy(other)
                        )));
                    }
                };
                return Ok(Some(value));
            }
            Event::Empty(e) => {
                let value = match e.name().as_ref() {
                    b"true" => Value::Bool(true),
                    b"false" => Value::Bool(false),
                    b"string" | b"data" | b"date" => Value::String(String::new()),
                    b"dict" => Value::Object(Map::new()),
                    b"array" => Value::Array(Vec::new()),
                    other => {
                        return Err(Error::Plist(format!(
                            "unexpected empty element <{}/>",
                            String::from_utf8_lossy(other)
                        )));
                    }
                };
                return Ok(Some(value));
            }
            Event::End(_) => return Ok(None),
            Event::Text(t) => {
                if !t.unescape().map_err(xml_err)?.trim().is_empty() {
                    return Err(Error::Plist("unexpected text between elements".into()));
                }
            }
            Event::Eof => return Err(Error::Plist("unexpected end of document".into())),
            _ => {}
        }
    }
}

fn parse_dict(reader: &mut XmlReader<'_>) -> Result<Value> {
    let mut map = Map::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == b"key" => {
                let key = read_text(reader)?;
                let value = next_value(reader)?
                    .ok_or_else(|| Error::Plist(format!("<key>{key}</key> without a value")))?;
                map.insert(key, value);
            }
            Event::End(e) if e.name().as_ref() == b"dict" => return Ok(Value::Object(map)),
            Event::Text(t) => {
                if !t.unescape().map_err(xml_err)?.trim().is_empty() {
                    return Err(Error::Plist("unexpected text in <dict>".into()));
                }
            }
            Event::Eof => return Err(Error::Plist("unterminated <dict>".into())),
            other => {
                return Err(Error::Plist(format!(
                    "expected <key> in <dict>, got {other:?}"
                )));
            }
        }
    }
}

fn parse_array(reader: &mut XmlReader<'_>) -> Result<Value> {
    let mut items = Vec::new();
    while let Some(value) = next_value(reader)? {
        items.push(value);
    }
    Ok(Value::Array(items))
}

/// Concatenate text up to the current element's end tag.
fn read_text(reader: &mut XmlReader<'_>) -> Result<String> {
    let mut out = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Text(t) => out.push_str(&t.unescape().map_err(xml_err)?),
            Event::End(_) => return Ok(out),
            Event::Eof => return Err(Error::Plist("unterminated text element".into())),
            other => {
                return Err(Error::Plist(format!(
                    "unexpected content in text element: {other:?}"
                )));
            }
        }
    }
}
