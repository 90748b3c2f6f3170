use fastfuzzy::{
    fuzzy, fuzzy_score, search, search_by, FuzzyError, FuzzyOutput, KeySet, MatchOptions,
    MatchSpan, SearchOverrides, Searcher, SharedSearcher, SortBy,
};

fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn test_ranking_scenario() {
    let items = ["items", "iterator", "itemize", "item", "temperature"];
    let found = search("item", &items, &MatchOptions::default());
    assert_eq!(
        found.into_items(),
        vec!["item", "items", "itemize", "iterator", "temperature"]
    );
}

#[test]
fn test_ranking_scores_with_match_data() {
    let items = ["items", "iterator", "itemize", "item", "temperature"];
    let options = MatchOptions::default().with_match_data(true);
    let records = search("item", &items, &options).into_matches().unwrap();

    let scores: Vec<f64> = records.iter().map(|r| r.score).collect();
    assert_eq!(scores[..3], [1.0, 1.0, 1.0]);
    assert!(approx(scores[3], 0.75));
    assert!(approx(scores[4], 0.75));
}

#[test]
fn test_offset_round_trip() {
    let options = MatchOptions::default().with_match_data(true);
    let FuzzyOutput::Match(record) = fuzzy("hello", "  h..e..l..l  ..o", &options) else {
        panic!("expected match data");
    };
    assert!(approx(record.score, 0.8));
    assert_eq!(record.key, "hell o");
    assert_eq!(record.span, MatchSpan { index: 2, length: 10 });
    let MatchSpan { index, length } = record.span;
    assert_eq!(&record.original[index..index + length], "h..e..l..l");
}

#[test]
fn test_transposition_costs() {
    let plain = MatchOptions::default().with_damerau(false);
    assert!(approx(fuzzy_score("abcd", "acbd", &plain), 0.5));
    assert!(approx(
        fuzzy_score("abcd", "acbd", &MatchOptions::default()),
        0.75
    ));
}

#[test]
fn test_whole_string_mode() {
    let whole = MatchOptions::default().with_sellers(false);
    assert_eq!(fuzzy_score("hello", "hello", &whole), 1.0);
    assert!(approx(fuzzy_score("hello", "hello there", &whole), 1.0 - 6.0 / 11.0));
    assert_eq!(fuzzy_score("hello", "hello there", &MatchOptions::default()), 1.0);

    let with_data = whole.with_match_data(true);
    let FuzzyOutput::Match(record) = fuzzy("hello", "hello there", &with_data) else {
        panic!("expected match data");
    };
    assert_eq!(record.span, MatchSpan { index: 0, length: 11 });
}

#[test]
fn test_empty_inputs() {
    let options = MatchOptions::default();
    assert_eq!(fuzzy_score("", "anything", &options), 1.0);
    assert_eq!(fuzzy_score("", "", &options), 1.0);
    assert_eq!(fuzzy_score("abc", "", &options), 0.0);
    assert_eq!(fuzzy_score("...", "abc", &options), 1.0);

    let items = ["alpha", "beta", "gamma"];
    assert_eq!(search("", &items, &options).len(), 3);
    assert!(search("alpha", &[] as &[&str], &options).is_empty());
}

#[test]
fn test_ignore_case_toggle() {
    let options = MatchOptions::default();
    assert_eq!(fuzzy_score("HELLO", "hello", &options), 1.0);
    assert_eq!(fuzzy_score("HELLO", "hello", &options.with_ignore_case(false)), 0.0);
}

#[test]
fn test_ignore_symbols_toggle() {
    let options = MatchOptions::default();
    assert_eq!(fuzzy_score("hello", "h.e.l.l.o", &options), 1.0);
    assert!(fuzzy_score("hello", "h.e.l.l.o", &options.with_ignore_symbols(false)) < 1.0);
}

#[test]
fn test_normalize_whitespace_toggle() {
    let options = MatchOptions::default();
    assert_eq!(fuzzy_score("hello world", "  hello \t world ", &options), 1.0);
    assert!(
        fuzzy_score(
            "hello world",
            "hello \t world",
            &options.with_normalize_whitespace(false)
        ) < 1.0
    );
}

#[test]
fn test_threshold_bounds() {
    let items = ["aaa", "aab", "abb", "bbb"];
    let everything = MatchOptions::default().with_threshold(0.0);
    assert_eq!(search("aaa", &items, &everything).len(), 4);

    let exact = MatchOptions::default().with_threshold(1.0);
    assert_eq!(search("aaa", &items, &exact).into_items(), vec!["aaa"]);

    let impossible = MatchOptions::default().with_threshold(1.5);
    assert!(search("aaa", &items, &impossible).is_empty());
}

#[test]
fn test_threshold_is_monotonic() {
    let items = ["hello", "help", "hollow", "yellow", "world", "held"];
    let mut previous = usize::MAX;
    for step in 0..=10 {
        let options = MatchOptions::default().with_threshold(step as f64 / 10.0);
        let count = search("hello", &items, &options).len();
        assert!(count <= previous);
        previous = count;
    }
}

#[test]
fn test_search_by_key_selector() {
    #[derive(Debug, Clone, PartialEq)]
    struct Book {
        title: &'static str,
        author: &'static str,
    }
    let books = [
        Book {
            title: "The Hobbit",
            author: "Tolkien",
        },
        Book {
            title: "Dune",
            author: "Herbert",
        },
    ];

    let options = MatchOptions::default();
    let found = search_by("herbert", &books, &options, |book| {
        Some(KeySet::from(vec![book.title, book.author]))
    })
    .unwrap()
    .into_items();
    assert_eq!(found, vec![books[1].clone()]);

    let err = search_by("dune", &books, &options, |book| {
        (book.title != "Dune").then(|| KeySet::from(book.title))
    })
    .unwrap_err();
    assert_eq!(err, FuzzyError::InvalidKey { item_index: 1 });
}

#[test]
fn test_searcher_scenario() {
    let mut searcher = Searcher::new(["aaa", "aab", "abb"], MatchOptions::default());
    searcher.add(["bbb"]);
    assert_eq!(searcher.search("aaa").into_items(), vec!["aaa", "aab"]);
    assert_eq!(searcher.search("bbb").into_items(), vec!["bbb", "abb"]);
    assert!(searcher.search("ccc").is_empty());
}

#[test]
fn test_searcher_agrees_with_one_shot_search() {
    let items = ["items", "iterator", "itemize", "item", "temperature"];
    let options = MatchOptions::default().with_match_data(true);
    let searcher = Searcher::new(items, options);
    assert_eq!(searcher.search("item"), search("item", &items, &options));
    assert_eq!(searcher.search("tmp"), search("tmp", &items, &options));
}

#[test]
fn test_searcher_overrides() {
    let searcher = Searcher::new(["temperature", "item", "items"], MatchOptions::default());
    let overrides = SearchOverrides::new()
        .sort_by(SortBy::InsertOrder)
        .threshold(0.7);
    assert_eq!(
        searcher.search_with("item", &overrides).into_items(),
        vec!["temperature", "item", "items"]
    );
}

#[test]
fn test_shared_searcher_round_trip() {
    let shared = SharedSearcher::new(vec!["hello".to_string()], MatchOptions::default());
    let handle = shared.clone();
    std::thread::spawn(move || handle.add(vec!["world".to_string()]))
        .join()
        .unwrap();
    assert_eq!(shared.len(), 2);
    assert_eq!(shared.search("world").into_items(), vec!["world".to_string()]);
}

#[test]
fn test_match_records_serialize() {
    let options = MatchOptions::default().with_match_data(true);
    let output = search("hello", &["  h..e..l..l  ..o"], &options);
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json[0]["item"], "  h..e..l..l  ..o");
    assert_eq!(json[0]["key"], "hell o");
    assert_eq!(json[0]["match"]["index"], 2);
    assert_eq!(json[0]["match"]["length"], 10);

    let plain = search("hello", &["hello"], &MatchOptions::default());
    assert_eq!(serde_json::to_value(&plain).unwrap(), serde_json::json!(["hello"]));
}

#[test]
fn test_long_inputs() {
    let options = MatchOptions::default();
    let haystack = format!("{}needle{}", "x".repeat(100_000), "y".repeat(100_000));
    assert_eq!(fuzzy_score("needle", &haystack, &options), 1.0);

    let mut searcher = Searcher::new(vec![haystack.clone()], options);
    searcher.add(vec!["needles".to_string()]);
    assert_eq!(searcher.search("needle").len(), 2);
    drop(searcher);
}

#[test]
fn test_symbol_before_combining_mark() {
    let options = MatchOptions::default().with_match_data(true);
    let FuzzyOutput::Match(record) = fuzzy("\u{e1}b", "a.\u{301}b", &options) else {
        panic!("expected match data");
    };
    assert_eq!(record.key, "\u{e1}b");
    assert_eq!(record.score, 1.0);
    assert_eq!(record.span, MatchSpan { index: 0, length: 5 });
}
