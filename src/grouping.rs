//! Ordering item identities so that near-duplicate listings sit together
//!
//! The same product is often logged under slightly different names across
//! orders ("Kirkland Signature Bananas" vs "Kirkland Signature Organic
//! Bananas"). Names are first tagged with the shared leading words removed,
//! since those are usually brand names, then the tags are chained by fuzzy
//! similarity.

use crate::similarity::partial_ratio;
use crate::types::ItemIdentity;

/// Split two names into their common leading words and the two remainders
pub fn trim_common_prefix_words(a: &str, b: &str) -> (String, String, String) {
    let words_a: Vec<&str> = a.split_whitespace().collect();
    let words_b: Vec<&str> = b.split_whitespace().collect();

    let shared = words_a
        .iter()
        .zip(words_b.iter())
        .take_while(|(x, y)| x == y)
        .count();

    (
        words_a[..shared].join(" "),
        words_a[shared..].join(" "),
        words_b[shared..].join(" "),
    )
}

/// An identity together with the name it is compared by
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedIdentity {
    pub identity: ItemIdentity,
    pub tag: String,
}

/// Tag each name-sorted identity by scanning adjacent pairs.
///
/// A pair sharing leading words tags both members with their remainders. An
/// identity already tagged as the second member of the previous pair keeps
/// that tag. Anything left untagged is tagged with its full name.
pub fn tag_identities(sorted: &[ItemIdentity]) -> Vec<TaggedIdentity> {
    let mut tags: Vec<Option<String>> = vec![None; sorted.len()];

    for (i, pair) in sorted.windows(2).enumerate() {
        let (prefix, first, second) = trim_common_prefix_words(&pair[0].name, &pair[1].name);
        if prefix.is_empty() {
            tags[i].get_or_insert_with(|| pair[0].name.clone());
        } else {
            tags[i].get_or_insert(first);
            tags[i + 1] = Some(second);
        }
    }

    sorted
        .iter()
        .zip(tags)
        .map(|(identity, tag)| TaggedIdentity {
            tag: tag.unwrap_or_else(|| identity.name.clone()),
            identity: identity.clone(),
        })
        .collect()
}

/// Similarity of two tagged identities.
///
/// A name that is entirely a shared prefix has an empty tag, which matches
/// nothing; such pairs are scored on their full names instead.
fn tag_similarity(a: &TaggedIdentity, b: &TaggedIdentity) -> u8 {
    if a.tag.is_empty() || b.tag.is_empty() {
        partial_ratio(&a.identity.name, &b.identity.name)
    } else {
        partial_ratio(&a.tag, &b.tag)
    }
}

/// Chain tagged identities by similarity.
///
/// Starts from the first tag in lexicographic order, then repeatedly takes
/// the remaining identity that scores highest against the last one taken.
/// Equal scores go to the earliest tag.
fn chain_by_similarity(mut tagged: Vec<TaggedIdentity>) -> Vec<ItemIdentity> {
    tagged.sort_by(|a, b| a.tag.cmp(&b.tag));

    let mut remaining = tagged.into_iter();
    let Some(first) = remaining.next() else {
        return Vec::new();
    };
    let mut remaining: Vec<TaggedIdentity> = remaining.collect();

    let mut ordered = Vec::with_capacity(remaining.len() + 1);
    let mut current = first;

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_score = 0u8;
        for (i, candidate) in remaining.iter().enumerate() {
            let score = tag_similarity(&current, candidate);
            if i == 0 || score > best_score {
                best_index = i;
                best_score = score;
            }
        }

        let next = remaining.remove(best_index);
        ordered.push(std::mem::replace(&mut current, next).identity);
    }
    ordered.push(current.identity);

    ordered
}

/// Order identities so that likely duplicates end up adjacent.
///
/// Zero or one identities are returned sorted by name only.
pub fn group_identities(identities: &[ItemIdentity]) -> Vec<ItemIdentity> {
    let mut sorted = identities.to_vec();
    sorted.sort();

    if sorted.len() < 2 {
        return sorted;
    }

    let tagged = tag_identities(&sorted);
    let ordered = chain_by_similarity(tagged);
    log::debug!("Grouped {} identities by similarity", ordered.len());
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[(&str, &str)]) -> Vec<ItemIdentity> {
        names.iter().map(|(n, u)| ItemIdentity::new(*n, *u)).collect()
    }

    fn position(ordered: &[ItemIdentity], name: &str) -> usize {
        ordered.iter().position(|i| i.name == name).unwrap()
    }

    #[test]
    fn test_trim_common_prefix_words() {
        let (prefix, a, b) =
            trim_common_prefix_words("Kirkland Signature Bananas", "Kirkland Signature Organic Bananas");
        assert_eq!(prefix, "Kirkland Signature");
        assert_eq!(a, "Bananas");
        assert_eq!(b, "Organic Bananas");

        let (prefix, a, b) = trim_common_prefix_words("Bananas", "Whole Milk");
        assert_eq!(prefix, "");
        assert_eq!(a, "Bananas");
        assert_eq!(b, "Whole Milk");
    }

    #[test]
    fn test_trim_matches_whole_words_only() {
        let (prefix, _, _) = trim_common_prefix_words("Banana Bread", "Bananas");
        assert!(prefix.is_empty());
    }

    #[test]
    fn test_tags_carry_forward() {
        let sorted = ids(&[("Kirkland A", "x"), ("Kirkland B", "x"), ("Kirkland C", "x")]);
        let tags: Vec<String> = tag_identities(&sorted).into_iter().map(|t| t.tag).collect();
        assert_eq!(tags, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_last_identity_is_kept() {
        let sorted = ids(&[("Bananas", "each"), ("Whole Milk", "1L")]);
        let tagged = tag_identities(&sorted);
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[1].tag, "Whole Milk");
    }

    #[test]
    fn test_banana_variants_adjacent() {
        let input = ids(&[
            ("Organic Bananas", "each"),
            ("Bananas", "each"),
            ("Whole Milk", "1L"),
        ]);

        let ordered = group_identities(&input);
        assert_eq!(ordered.len(), 3);

        let plain = position(&ordered, "Bananas");
        let organic = position(&ordered, "Organic Bananas");
        let milk = position(&ordered, "Whole Milk");
        assert_eq!(plain.abs_diff(organic), 1);
        assert!(milk < plain.min(organic) || milk > plain.max(organic));
    }

    #[test]
    fn test_brand_prefixes_ignored() {
        let input = ids(&[
            ("Kirkland Signature Bananas", "each"),
            ("Natrel Whole Milk", "1L"),
            ("Dole Bananas", "each"),
            ("Kirkland Signature Organic Bananas", "each"),
            ("Whole Milk", "1L"),
        ]);

        let ordered = group_identities(&input);
        assert_eq!(ordered.len(), 5);

        let bananas: Vec<usize> = ordered
            .iter()
            .enumerate()
            .filter(|(_, i)| i.name.contains("Bananas"))
            .map(|(p, _)| p)
            .collect();
        assert_eq!(bananas.len(), 3);
        assert_eq!(bananas[2] - bananas[0], 2, "bananas not contiguous: {ordered:?}");

        let milk_a = position(&ordered, "Natrel Whole Milk");
        let milk_b = position(&ordered, "Whole Milk");
        assert_eq!(milk_a.abs_diff(milk_b), 1);
    }

    #[test]
    fn test_word_prefix_names_adjacent() {
        let input = ids(&[
            ("Apple Juice", "1L"),
            ("Apple Juice Box", "6x200ml"),
            ("Bananas", "each"),
            ("Organic Bananas", "each"),
        ]);

        let ordered = group_identities(&input);
        assert_eq!(ordered.len(), 4);
        assert_eq!(
            position(&ordered, "Apple Juice").abs_diff(position(&ordered, "Apple Juice Box")),
            1,
            "juice split: {ordered:?}"
        );
        assert_eq!(
            position(&ordered, "Bananas").abs_diff(position(&ordered, "Organic Bananas")),
            1,
            "bananas split: {ordered:?}"
        );
    }

    #[test]
    fn test_empty_tag_keeps_partner_over_earlier_tags() {
        let input = ids(&[
            ("Kirkland Signature Bananas", "each"),
            ("Kirkland Signature Bananas Organic", "each"),
            ("Dole Pineapple", "each"),
            ("Avocados", "each"),
        ]);

        let mut sorted = input.clone();
        sorted.sort();
        let tagged = tag_identities(&sorted);
        assert_eq!(tagged[2].tag, "");
        assert_eq!(tagged[3].tag, "Organic");

        let ordered = group_identities(&input);
        let plain = position(&ordered, "Kirkland Signature Bananas");
        let organic = position(&ordered, "Kirkland Signature Bananas Organic");
        assert_eq!(plain.abs_diff(organic), 1, "pair split: {ordered:?}");
    }

    #[test]
    fn test_same_name_different_units_kept_apart() {
        let input = ids(&[("Bananas", "1 lb"), ("Bananas", "each")]);
        let ordered = group_identities(&input);
        assert_eq!(ordered.len(), 2);
        assert_ne!(ordered[0], ordered[1]);
    }

    #[test]
    fn test_trivial_inputs_pass_through() {
        assert!(group_identities(&[]).is_empty());

        let single = ids(&[("Whole Milk", "1L")]);
        assert_eq!(group_identities(&single), single);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let mut input = ids(&[
            ("Organic Bananas", "each"),
            ("Bananas", "each"),
            ("Whole Milk", "1L"),
            ("Natrel Whole Milk", "1L"),
        ]);
        let first = group_identities(&input);
        input.reverse();
        assert_eq!(group_identities(&input), first);
    }
}
