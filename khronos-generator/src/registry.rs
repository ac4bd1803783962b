use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context as _, bail};
use xml::{AttributeIterator, Element, ElementIterator, Tag};

use crate::{Api, Version};

// xml spec:
// https://github.com/KhronosGroup/OpenGL-Registry/blob/8e772a3b0c9e8a85ccb6f471b4cdbf94c8bcd71d/xml/readme.pdf

#[derive(Debug)]
pub struct Enum<'a> {
    pub value: &'a str,
    pub name: &'a str,
    pub api: Option<&'a str>,
    pub r#type: Option<&'a str>,
    pub group: Option<&'a str>,
    pub alias: Option<&'a str>,
    pub comment: Option<&'a str>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandTypePart<'a> {
    Defined(&'a str),
    Other(&'a str),
}

#[derive(Debug)]
pub struct CommandPart<'a> {
    pub type_parts: Vec<CommandTypePart<'a>>,
    pub name: &'a str,
}

#[derive(Debug)]
pub struct Command<'a> {
    pub proto: CommandPart<'a>,
    pub params: Vec<CommandPart<'a>>,
}

#[derive(Debug)]
pub struct Interface<'a> {
    /// set when the block only applies to one api (`<require api="gles2">`).
    pub api: Option<&'a str>,
    pub enums: Vec<&'a str>,
    pub commands: Vec<&'a str>,
}

#[derive(Debug)]
pub struct Feature<'a> {
    pub api: &'a str,
    pub name: &'a str,
    pub number: &'a str,
    pub requires: Vec<Interface<'a>>,
    pub removes: Vec<Interface<'a>>,
}

#[derive(Debug)]
pub struct Extension<'a> {
    pub name: &'a str,
    pub supported: &'a str,
    pub requires: Vec<Interface<'a>>,
}

#[derive(Debug)]
pub struct Registry<'a> {
    pub enums: Vec<Enum<'a>>,
    pub commands: Vec<Command<'a>>,
    pub features: Vec<Feature<'a>>,
    pub extensions: Vec<Extension<'a>>,
    /// enum/command name -> names of features and extensions that require it. empty until the
    /// registry is filtered.
    pub requirements: HashMap<&'a str, Vec<&'a str>>,
}

fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace())
}

fn expect_text<'a>(element_iterator: &mut ElementIterator<'a>) -> anyhow::Result<&'a str> {
    let Some(element) = element_iterator.next() else {
        bail!("unexpected eof");
    };
    let Element::Text(text) = element else {
        bail!("unexpected element (got {element:?}, want text)");
    };
    Ok(text)
}

fn expect_end_tag(element_iterator: &mut ElementIterator<'_>, name: &str) -> anyhow::Result<()> {
    let Some(element) = element_iterator.next() else {
        bail!("unexpected eof");
    };
    match element {
        Element::EndTag(end) if end == name => Ok(()),
        other => bail!("unexpected element (got {other:?}, want end of {name})"),
    }
}

/// picks `keys` out of attrs, in the order of `keys`. keys listed in `ignored` are skipped;
/// anything else, or a key that shows up twice, is an error.
fn collect_attrs<'a, const N: usize>(
    attrs: AttributeIterator<'a>,
    keys: [&str; N],
    ignored: &[&str],
) -> anyhow::Result<[Option<&'a str>; N]> {
    let mut values = [None; N];
    for attr in attrs {
        if ignored.contains(&attr.key) {
            continue;
        }
        let Some(index) = keys.iter().position(|key| *key == attr.key) else {
            bail!("unexpected attr {:?}", attr.key);
        };
        if values[index].replace(attr.value).is_some() {
            bail!("duplicate attr {:?}", attr.key);
        }
    }
    Ok(values)
}

fn parse_enum<'a>(
    empty_tag: Tag<'a>,
    block_type: Option<&'a str>,
) -> anyhow::Result<Enum<'a>> {
    let [value, name, api, r#type, group, alias, comment] = collect_attrs(
        empty_tag.iter_attrs(),
        ["value", "name", "api", "type", "group", "alias", "comment"],
        &[],
    )?;
    Ok(Enum {
        value: value.context("value is missing")?,
        name: name.context("name is missing")?,
        api,
        // a token's own type wins over the type of its block.
        r#type: r#type.or(block_type),
        group,
        alias,
        comment,
    })
}

fn parse_enum_block<'a>(
    start_tag: Tag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Vec<Enum<'a>>> {
    let block_type = start_tag.attr("type");
    let mut enums = Vec::new();
    while let Some(element) = element_iterator.next() {
        match element {
            Element::EmptyTag(empty) if empty.name == "enum" => {
                enums.push(parse_enum(empty, block_type).context("could not parse enum")?);
            }
            Element::EmptyTag(empty) if empty.name == "unused" => {}
            Element::EndTag(end) if end == "enums" => return Ok(enums),
            Element::Text(text) if is_blank(text) => {}
            Element::Comment(_) => {}
            other => bail!("unexpected element in enums: {other:?}"),
        }
    }
    bail!("unexpected eof in enums")
}

fn parse_command_part<'a>(
    tag_name: &str,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<CommandPart<'a>> {
    let mut type_parts = Vec::new();
    let mut name = None;
    while let Some(element) = element_iterator.next() {
        match element {
            Element::Text(text) if is_blank(text) => {}
            Element::Text(text) => type_parts.push(CommandTypePart::Other(text.trim())),
            Element::StartTag(start) if start.name == "ptype" => {
                let defined = expect_text(element_iterator)?.trim();
                expect_end_tag(element_iterator, "ptype")?;
                type_parts.push(CommandTypePart::Defined(defined));
            }
            Element::StartTag(start) if start.name == "name" => {
                let text = expect_text(element_iterator)?.trim();
                expect_end_tag(element_iterator, "name")?;
                if name.replace(text).is_some() {
                    bail!("{tag_name} has more than one name");
                }
            }
            Element::EndTag(end) if end == tag_name => {
                return Ok(CommandPart {
                    type_parts,
                    name: name.with_context(|| format!("{tag_name} name is missing"))?,
                });
            }
            other => bail!("unexpected element in {tag_name}: {other:?}"),
        }
    }
    bail!("unexpected eof in {tag_name}")
}

fn parse_command<'a>(element_iterator: &mut ElementIterator<'a>) -> anyhow::Result<Command<'a>> {
    let mut proto = None;
    let mut params = Vec::new();
    while let Some(element) = element_iterator.next() {
        match element {
            Element::StartTag(start) if start.name == "proto" => {
                let part = parse_command_part("proto", element_iterator)?;
                if proto.replace(part).is_some() {
                    bail!("command has more than one proto");
                }
            }
            Element::StartTag(start) if start.name == "param" => {
                params.push(parse_command_part("param", element_iterator)?);
            }
            Element::EndTag(end) if end == "command" => {
                return Ok(Command {
                    proto: proto.context("proto is missing")?,
                    params,
                });
            }
            // gl.xml annotations that carry nothing for bindings.
            Element::EmptyTag(empty) if matches!(empty.name, "glx" | "alias" | "vecequiv") => {}
            Element::Text(text) if is_blank(text) => {}
            Element::Comment(_) => {}
            other => bail!("unexpected element in command: {other:?}"),
        }
    }
    bail!("unexpected eof in command")
}

fn parse_interface<'a>(
    start_tag: Tag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Interface<'a>> {
    let mut interface = Interface {
        api: start_tag.attr("api"),
        enums: Vec::new(),
        commands: Vec::new(),
    };
    while let Some(element) = element_iterator.next() {
        match element {
            Element::EmptyTag(empty) => {
                let name = || empty.attr("name").context("name is missing");
                match empty.name {
                    "enum" => interface.enums.push(name()?),
                    "command" => interface.commands.push(name()?),
                    "type" => {}
                    other => bail!("unexpected {other} in {}", start_tag.name),
                }
            }
            Element::EndTag(end) if end == start_tag.name => return Ok(interface),
            Element::Text(text) if is_blank(text) => {}
            Element::Comment(_) => {}
            other => bail!("unexpected element in {}: {other:?}", start_tag.name),
        }
    }
    bail!("unexpected eof in {}", start_tag.name)
}

/// require and remove blocks of a feature or an extension, up to the end of `tag_name`.
fn parse_interfaces<'a>(
    tag_name: &str,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<(Vec<Interface<'a>>, Vec<Interface<'a>>)> {
    let mut requires = Vec::new();
    let mut removes = Vec::new();
    while let Some(element) = element_iterator.next() {
        match element {
            Element::StartTag(start) if start.name == "require" => {
                requires.push(parse_interface(start, element_iterator).context("bad require")?);
            }
            Element::StartTag(start) if start.name == "remove" => {
                removes.push(parse_interface(start, element_iterator).context("bad remove")?);
            }
            Element::EmptyTag(empty) if matches!(empty.name, "require" | "remove") => {}
            Element::EndTag(end) if end == tag_name => return Ok((requires, removes)),
            Element::Text(text) if is_blank(text) => {}
            Element::Comment(_) => {}
            other => bail!("unexpected element in {tag_name}: {other:?}"),
        }
    }
    bail!("unexpected eof in {tag_name}")
}

fn parse_feature<'a>(
    start_tag: Tag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Feature<'a>> {
    let [api, name, number] = collect_attrs(
        start_tag.iter_attrs(),
        ["api", "name", "number"],
        &["comment", "protect"],
    )?;
    let name = name.context("name is missing")?;
    let (requires, removes) =
        parse_interfaces("feature", element_iterator).with_context(|| format!("in {name}"))?;
    Ok(Feature {
        api: api.context("api is missing")?,
        name,
        number: number.context("number is missing")?,
        requires,
        removes,
    })
}

fn parse_extension_tag<'a>(tag: &Tag<'a>) -> anyhow::Result<Extension<'a>> {
    let [name, supported] = collect_attrs(
        tag.iter_attrs(),
        ["name", "supported"],
        &["comment", "protect", "depends", "ratified"],
    )?;
    let name = name.context("name is missing")?;
    Ok(Extension {
        name,
        supported: supported
            .with_context(|| format!("supported is missing in {name}"))?,
        requires: Vec::new(),
    })
}

fn parse_extension<'a>(
    start_tag: Tag<'a>,
    element_iterator: &mut ElementIterator<'a>,
) -> anyhow::Result<Extension<'a>> {
    let mut extension = parse_extension_tag(&start_tag)?;
    let (requires, removes) = parse_interfaces("extension", element_iterator)
        .with_context(|| format!("in {}", extension.name))?;
    if !removes.is_empty() {
        bail!("extension {} removes interfaces", extension.name);
    }
    extension.requires = requires;
    Ok(extension)
}

pub fn parse_registry(input: &str) -> anyhow::Result<Registry<'_>> {
    let mut registry = Registry {
        enums: Vec::new(),
        commands: Vec::new(),
        features: Vec::new(),
        extensions: Vec::new(),
        requirements: HashMap::new(),
    };

    let mut element_iterator = ElementIterator::new(input);
    while let Some(element) = element_iterator.next() {
        let start = match element {
            // NOTE: plenty of extensions in the upstream gl.xml only reserve a name and come as
            // `<extension name=".." supported=".."/>`.
            Element::EmptyTag(empty) if empty.name == "extension" => {
                registry.extensions.push(
                    parse_extension_tag(&empty).context("could not parse extension")?,
                );
                continue;
            }
            Element::StartTag(start) => start,
            // types, groups and container tags carry nothing the generator needs.
            _ => continue,
        };
        match start.name {
            "enums" => registry.enums.extend(
                parse_enum_block(start, &mut element_iterator).context("could not parse enums")?,
            ),
            "command" => registry.commands.push(
                parse_command(&mut element_iterator).context("could not parse command")?,
            ),
            "feature" => registry.features.push(
                parse_feature(start, &mut element_iterator).context("could not parse feature")?,
            ),
            "extension" => registry.extensions.push(
                parse_extension(start, &mut element_iterator)
                    .context("could not parse extension")?,
            ),
            _ => {}
        }
    }

    Ok(registry)
}

fn require<'a>(
    requirements: &mut HashMap<&'a str, Vec<&'a str>>,
    name: &'a str,
    required_by: &'a str,
) {
    let entry = requirements.entry(name).or_default();
    if !entry.contains(&required_by) {
        entry.push(required_by);
    }
}

pub fn filter_registry<'a>(
    mut registry: Registry<'a>,
    api: &Api,
    version: &Version,
    extensions: &[&str],
) -> anyhow::Result<Registry<'a>> {
    let api_str = api.as_str();
    let applies = |interface: &Interface| interface.api.is_none_or(|it| it == api_str);

    let mut requirements: HashMap<&'a str, Vec<&'a str>> = HashMap::new();

    let mut found_feature = false;
    for feat in registry.features.iter() {
        if feat.api != api_str {
            continue;
        }

        let feat_version = Version::from_str(feat.number)
            .with_context(|| format!("invalid feature number of {}", feat.name))?;
        if feat_version > *version {
            continue;
        }
        if feat_version == *version {
            found_feature = true;
        }

        for require_block in feat.requires.iter().filter(|it| applies(*it)) {
            for name in require_block.enums.iter().chain(require_block.commands.iter()) {
                require(&mut requirements, *name, feat.name);
            }
        }
        for remove_block in feat.removes.iter().filter(|it| applies(*it)) {
            for name in remove_block.enums.iter().chain(remove_block.commands.iter()) {
                requirements.remove(name);
            }
        }
    }
    if !found_feature {
        bail!("could not find {api:?} {version:?}");
    }

    for wanted in extensions.iter() {
        let Some(ext) = registry.extensions.iter().find(|ext| ext.name == *wanted) else {
            bail!("could not find extension {wanted}");
        };
        if !ext.supported.split('|').any(|part| part == api_str) {
            bail!("{} is not supported on {api:?} {version:?}", ext.name);
        }
        for require_block in ext.requires.iter().filter(|it| applies(*it)) {
            for name in require_block.enums.iter().chain(require_block.commands.iter()) {
                require(&mut requirements, *name, ext.name);
            }
        }
    }

    registry.enums.retain(|e| {
        requirements.contains_key(e.name) && e.api.is_none_or(|it| it == api_str)
    });
    registry
        .commands
        .retain(|c| requirements.contains_key(c.proto.name));
    registry.requirements = requirements;

    Ok(registry)
}
