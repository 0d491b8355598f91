//! Mention deduplication
//!
//! Items sharing `(type, name)` fold into the first one seen, wherever they
//! were filed. List fields are unioned in first-seen order, promotion status
//! resolves by precedence, category keeps the first non-null value and
//! confidence the highest.

use crate::warning::{NormalizationWarning, WarningKind};
use std::collections::HashMap;
use vdp_core::{MentionItem, MentionKind};

/// Merge duplicate mentions, keeping first-seen order of distinct items.
pub fn merge_mentions(items: &[MentionItem]) -> Vec<MentionItem> {
    let mut merged: Vec<MentionItem> = Vec::with_capacity(items.len());
    let mut index: HashMap<(MentionKind, &str), usize> = HashMap::new();

    for item in items {
        let key = (item.kind, item.name.as_str());
        if let Some(&at) = index.get(&key) {
            absorb(&mut merged[at], item);
            continue;
        }
        index.insert(key, merged.len());
        merged.push(item.clone());
    }
    merged
}

fn absorb(into: &mut MentionItem, other: &MentionItem) {
    union(&mut into.sources, &other.sources);
    union(&mut into.evidence, &other.evidence);
    union(&mut into.promotion.signals, &other.promotion.signals);
    if let Some(ranges) = &other.time_ranges {
        union(into.time_ranges.get_or_insert_with(Vec::new), ranges);
    }
    into.promotion.status = into.promotion.status.strongest(other.promotion.status);
    if into.category.is_none() {
        into.category = other.category.clone();
    }
    into.confidence = into.confidence.max(other.confidence);
}

fn union<T: PartialEq + Clone>(into: &mut Vec<T>, other: &[T]) {
    for value in other {
        if !into.contains(value) {
            into.push(value.clone());
        }
    }
}

/// Merge `product_mentions` and `service_mentions` as one pool and file each
/// merged item under the list matching its type. Returns `(products,
/// services)`.
pub fn normalize_lists(
    products: &[MentionItem],
    services: &[MentionItem],
    warnings: &mut Vec<NormalizationWarning>,
) -> (Vec<MentionItem>, Vec<MentionItem>) {
    scan(PRODUCT_LIST, MentionKind::Product, products, warnings);
    scan(SERVICE_LIST, MentionKind::Service, services, warnings);

    let pool: Vec<MentionItem> = products.iter().chain(services).cloned().collect();
    let (merged_products, merged_services): (Vec<_>, Vec<_>) =
        merge_mentions(&pool).into_iter().partition(|m| m.kind == MentionKind::Product);

    for (list, kind, merged) in [
        (PRODUCT_LIST, MentionKind::Product, &merged_products),
        (SERVICE_LIST, MentionKind::Service, &merged_services),
    ] {
        let before = pool.iter().filter(|m| m.kind == kind).count();
        if merged.len() < before {
            warnings.push(NormalizationWarning::new(
                WarningKind::DuplicateMentionMerged,
                list,
                format!("{} {} mentions merged into {}", before, kind, merged.len()),
            ));
        }
    }
    (merged_products, merged_services)
}

const PRODUCT_LIST: &str = "product_mentions";
const SERVICE_LIST: &str = "service_mentions";

/// Report misfiled items and inverted time ranges in one list.
fn scan(list: &str, expected: MentionKind, items: &[MentionItem], warnings: &mut Vec<NormalizationWarning>) {
    for (i, item) in items.iter().enumerate() {
        let path = format!("{}[{}]", list, i);
        if item.kind != expected {
            warnings.push(NormalizationWarning::new(
                WarningKind::MentionTypeMismatch,
                format!("{}.type", path),
                format!("{} mention {:?} listed under {}", item.kind, item.name, list),
            ));
        }
        for (r, [start, end]) in item.time_ranges.iter().flatten().enumerate() {
            if start > end {
                warnings.push(NormalizationWarning::new(
                    WarningKind::InvalidTimeRange,
                    format!("{}.time_ranges[{}]", path, r),
                    format!("range starts at {} after it ends at {}", start, end),
                ));
            }
        }
    }
}
