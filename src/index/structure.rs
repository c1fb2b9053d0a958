use serde::Serialize;

use crate::storage::image_catalog::DatasetStructure;
use crate::storage::summary::SummaryIndex;

pub const TOP_MEMBERS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCount {
    pub id: String,
    pub name: String,
    pub count: u64,
}

/// One browsable group with its record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub member_count: usize,
    pub record_count: u64,
    pub top_members: Vec<MemberCount>,
}

/// Per-group counts and corpus totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralSummary {
    pub groups: Vec<GroupSummary>,
    pub total_groups: usize,
    pub total_members: usize,
    pub total_records: u64,
    pub avg_records_per_group: u64,
}

/// Highest counts first; equal counts keep declared order.
pub fn top_by_count(members: &[MemberCount], n: usize) -> Vec<MemberCount> {
    let mut sorted = members.to_vec();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(n);
    sorted
}

/// Categories as groups, subcategories as members.
pub fn summarize_dataset(structure: &DatasetStructure) -> StructuralSummary {
    let groups: Vec<GroupSummary> = structure
        .categories
        .iter()
        .map(|category| {
            let members: Vec<MemberCount> = category
                .subcategories
                .iter()
                .map(|sub| MemberCount {
                    id: sub.id.clone(),
                    name: sub.name.clone(),
                    count: u64::from(sub.count),
                })
                .collect();
            GroupSummary {
                id: category.id.clone(),
                name: category.name.clone(),
                member_count: members.len(),
                record_count: category.total,
                top_members: top_by_count(&members, TOP_MEMBERS),
            }
        })
        .collect();

    let total_records = groups.iter().map(|g| g.record_count).sum();
    finish(groups, total_records, total_records)
}

/// Quiz collections as groups. The average follows the declared
/// per-collection size, not the loaded count.
pub fn summarize_collections(index: &SummaryIndex) -> StructuralSummary {
    let groups: Vec<GroupSummary> = index
        .collections
        .iter()
        .map(|c| GroupSummary {
            id: c.source_id.clone(),
            name: c.title.clone(),
            member_count: 0,
            record_count: c.actual_count,
            top_members: Vec::new(),
        })
        .collect();

    let total_records = groups.iter().map(|g| g.record_count).sum();
    let declared: u64 = index.collections.iter().map(|c| c.questions_per_collection).sum();
    finish(groups, total_records, declared)
}

fn finish(groups: Vec<GroupSummary>, total_records: u64, avg_basis: u64) -> StructuralSummary {
    let total_groups = groups.len();
    let avg_records_per_group = if total_groups == 0 {
        0
    } else {
        (avg_basis as f64 / total_groups as f64).round() as u64
    };
    StructuralSummary {
        total_members: groups.iter().map(|g| g.member_count).sum(),
        total_groups,
        total_records,
        avg_records_per_group,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::image_catalog::ImageCatalog;
    use crate::storage::summary::CollectionSummary;
    use chrono::Utc;

    fn member(id: &str, count: u64) -> MemberCount {
        MemberCount { id: id.to_string(), name: id.to_string(), count }
    }

    #[test]
    fn ties_keep_declared_order() {
        let members = vec![member("a", 5), member("b", 9), member("c", 5), member("d", 5)];
        let top: Vec<_> = top_by_count(&members, 3).into_iter().map(|m| m.id).collect();
        assert_eq!(top, vec!["b", "a", "c"]);
    }

    #[test]
    fn dataset_summary_lists_top_subcategories() {
        let catalog = ImageCatalog::new("a", "b");
        let summary = summarize_dataset(&catalog.structure(Utc::now()));
        assert_eq!(summary.total_groups, 5);
        assert_eq!(summary.total_members, 17);
        assert_eq!(summary.total_records, 9757);

        let dogs = summary.groups.iter().find(|g| g.id == "dog").unwrap();
        let top: Vec<_> = dogs.top_members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(top, vec!["samoye", "dog_mixed", "hashiqi"]);
    }

    #[test]
    fn collection_summary_averages_declared_sizes() {
        let summary = |id: &str, actual: u64, per: u64| CollectionSummary {
            source_id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            declared_total: actual,
            questions_per_collection: per,
            actual_count: actual,
            file_size: 0,
            last_modified: None,
            added_at: None,
        };
        let index = SummaryIndex::from_summaries(
            vec![summary("a", 50, 10), summary("b", 20, 15)],
            Utc::now(),
        );
        let stats = summarize_collections(&index);
        assert_eq!(stats.total_records, 70);
        assert_eq!(stats.avg_records_per_group, 13);

        let empty = SummaryIndex::from_summaries(Vec::new(), Utc::now());
        assert_eq!(summarize_collections(&empty).avg_records_per_group, 0);
    }
}
