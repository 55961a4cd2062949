use std::collections::{BTreeMap, BTreeSet};

use linkrank_core::Corpus;
use proptest::prelude::*;

/// Page map over ids `p0..pN` whose links never point at the page itself.
fn arb_page_map() -> impl Strategy<Value = BTreeMap<String, BTreeSet<String>>> {
    (1_usize..10).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::btree_set(0..n, 0..n), n).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, targets)| {
                    let links = targets
                        .into_iter()
                        .filter(|&j| j != i)
                        .map(|j| format!("p{j}"))
                        .collect();
                    (format!("p{i}"), links)
                })
                .collect()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn valid_maps_round_trip_through_to_links(pages in arb_page_map()) {
        let corpus = Corpus::from_links(pages.clone()).expect("valid corpus");
        let back: BTreeMap<String, BTreeSet<String>> = corpus
            .to_links()
            .into_iter()
            .map(|(p, ls)| (p.to_string(), ls.into_iter().map(str::to_string).collect()))
            .collect();
        prop_assert_eq!(back, pages);
    }

    #[test]
    fn counts_match_input(pages in arb_page_map()) {
        let corpus = Corpus::from_links(pages.clone()).expect("valid corpus");
        prop_assert_eq!(corpus.page_count(), pages.len());
        prop_assert_eq!(corpus.link_count(), pages.values().map(BTreeSet::len).sum::<usize>());
        for (i, (page, links)) in pages.iter().enumerate() {
            prop_assert_eq!(corpus.page_index(page), Some(i));
            prop_assert_eq!(corpus.out_degree(i), links.len());
            prop_assert_eq!(corpus.is_dangling(i), links.is_empty());
        }
    }

    #[test]
    fn fingerprint_ignores_insertion_order(pages in arb_page_map()) {
        let forward = Corpus::from_links(pages.clone()).expect("valid corpus");
        let reversed = Corpus::from_links(pages.into_iter().rev()).expect("valid corpus");
        prop_assert_eq!(forward.content_hash(), reversed.content_hash());
    }

    #[test]
    fn adding_a_self_link_is_rejected(pages in arb_page_map(), pick in any::<prop::sample::Index>()) {
        let mut pages = pages;
        let page = pick.get(&pages.keys().cloned().collect::<Vec<_>>()).clone();
        if let Some(links) = pages.get_mut(&page) {
            links.insert(page.clone());
        }
        prop_assert!(Corpus::from_links(pages).is_err());
    }
}
