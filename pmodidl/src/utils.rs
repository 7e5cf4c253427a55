//! Fonctions utilitaires : noms qualifiés, accès aux nœuds XML et durées.

use xmltree::{Element as XmlElement, XMLNode};

/// Nom qualifié `prefix:local` d'un nœud, qu'il vienne d'un document analysé
/// (préfixe séparé) ou qu'il ait été construit avec un nom déjà qualifié.
pub fn qualified_name(node: &XmlElement) -> String {
    match &node.prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, node.name),
        _ => node.name.clone(),
    }
}

/// Partie locale d'un nom éventuellement préfixé.
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

pub fn has_prefix(name: &str) -> bool {
    name.contains(':')
}

/// Compare un nom trouvé dans le document au nom attendu.
///
/// En mode tolérant, deux noms dont l'un n'a pas de préfixe sont égaux si
/// leurs parties locales le sont.
pub fn names_match(actual: &str, expected: &str, lenient: bool) -> bool {
    if actual == expected {
        return true;
    }
    lenient
        && (!has_prefix(actual) || !has_prefix(expected))
        && local_part(actual) == local_part(expected)
}

/// Sous-éléments directs d'un nœud.
pub fn child_elements(node: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    node.children.iter().filter_map(|child| match child {
        XMLNode::Element(elem) => Some(elem),
        _ => None,
    })
}

/// Sous-éléments directs dont le nom correspond à `name`.
pub fn matching_children<'a>(node: &'a XmlElement, name: &str, lenient: bool) -> Vec<&'a XmlElement> {
    child_elements(node)
        .filter(|child| names_match(&qualified_name(child), name, lenient))
        .collect()
}

/// Cherche un attribut par nom exact, puis par partie locale en mode
/// tolérant.
pub fn find_attribute<'a>(node: &'a XmlElement, name: &str, lenient: bool) -> Option<&'a String> {
    if let Some(value) = node.attributes.get(name) {
        return Some(value);
    }
    if !lenient {
        return None;
    }
    node.attributes
        .iter()
        .find(|(key, _)| !key.starts_with("xmlns") && names_match(key, name, true))
        .map(|(_, value)| value)
}

/// Texte d'un nœud (sections texte et CDATA concaténées).
pub fn node_text(node: &XmlElement) -> Option<String> {
    node.get_text().map(|text| text.into_owned())
}

/// Construit un nœud `<name>text</name>`.
pub fn text_element(name: &str, text: &str) -> XmlElement {
    let mut elem = XmlElement::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    elem
}

/// Formate une durée en secondes au format `H:MM:SS`.
pub fn format_duration(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

/// Formate une durée au format `P<j>D<hh>:<mm>:<ss>`.
pub fn format_period(seconds: u64) -> String {
    let days = seconds / 86_400;
    let rest = seconds % 86_400;
    format!(
        "P{}D{:02}:{:02}:{:02}",
        days,
        rest / 3600,
        (rest % 3600) / 60,
        rest % 60
    )
}

/// Lit une durée `H:MM:SS`, `H:MM:SS.fff` ou `P<j>D<hh>:<mm>:<ss>` et la
/// convertit en secondes (fraction tronquée).
pub fn parse_duration(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let (days, clock) = match raw.strip_prefix('P') {
        Some(period) => {
            let (days, clock) = period.split_once('D')?;
            (days.parse::<u64>().ok()?, clock)
        }
        None => (0, raw),
    };

    let clock = clock.split_once('.').map_or(clock, |(whole, _)| whole);
    let parts: Vec<&str> = clock.split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return None;
    };
    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    days.checked_mul(86_400)?
        .checked_add(hours.checked_mul(3600)?)?
        .checked_add(minutes * 60 + seconds)
}
