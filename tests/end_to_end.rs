//! Load a corpus file, search it, save the results

use posseq::session::parse_line;
use posseq::{Action, Corpus, Outcome, Session, SessionState, Tag, describe_in, find_matches, save_matches, validate};
use std::fs;
use tempfile::tempdir;

const CONLLU: &str = "# sent_id = 1
# text = The big dog ran home.
1\tThe\tthe\tDET\tDT\t_\t3\tdet\t_\t_
2\tbig\tbig\tADJ\tJJ\t_\t3\tamod\t_\t_
3\tdog\tdog\tNOUN\tNN\t_\t4\tnsubj\t_\t_
4\tran\trun\tVERB\tVBD\t_\t0\troot\t_\t_
5\thome\thome\tADV\tRB\t_\t4\tadvmod\t_\tSpaceAfter=No
6\t.\t.\tPUNCT\t.\t_\t4\tpunct\t_\t_

# sent_id = 2
# text = A small cat and a tall dog slept.
1\tA\ta\tDET\tDT\t_\t3\tdet\t_\t_
2\tsmall\tsmall\tADJ\tJJ\t_\t3\tamod\t_\t_
3\tcat\tcat\tNOUN\tNN\t_\t8\tnsubj\t_\t_
4\tand\tand\tCCONJ\tCC\t_\t7\tcc\t_\t_
5\ta\ta\tDET\tDT\t_\t7\tdet\t_\t_
6\ttall\ttall\tADJ\tJJ\t_\t7\tamod\t_\t_
7\tdog\tdog\tNOUN\tNN\t_\t3\tconj\t_\t_
8\tslept\tsleep\tVERB\tVBD\t_\t0\troot\t_\tSpaceAfter=No
9\t.\t.\tPUNCT\t.\t_\t8\tpunct\t_\t_
";

#[test]
fn test_conllu_file_search_and_save() {
    let dir = tempdir().unwrap();
    let corpus_path = dir.path().join("tiny.conllu");
    fs::write(&corpus_path, CONLLU).unwrap();

    let corpus = Corpus::from_file(&corpus_path, None).unwrap();
    assert_eq!(corpus.len(), 15);

    let query = validate("det adj noun").unwrap();
    let matches = find_matches(&query, &corpus);
    let lines: Vec<_> = matches.lines().collect();
    assert_eq!(lines, vec!["The big dog", "A small cat", "a tall dog"]);
    assert_eq!(
        describe_in(&query, &matches, corpus.name()),
        "Showing 3 phrase(s) from the tiny corpus that match the POS sequence DET ADJ NOUN:"
    );

    let written = save_matches(&dir.path().join("results"), &matches).unwrap();
    assert_eq!(
        fs::read_to_string(written).unwrap(),
        "The big dog\nA small cat\na tall dog\n"
    );
}

#[test]
fn test_punctuation_splits_sentences() {
    let corpus = Corpus::parse("tiny", CONLLU.as_bytes(), posseq::CorpusFormat::Conllu).unwrap();
    // "home ." then "A": the PUNCT token sits between ADV and DET
    let query = validate("ADV DET").unwrap();
    assert!(find_matches(&query, &corpus).is_empty());

    let query = validate("NOUN CONJ DET").unwrap();
    let lines: Vec<_> = find_matches(&query, &corpus).lines().collect();
    assert_eq!(lines, vec!["cat and a"]);
}

#[test]
fn test_interactive_script() {
    let dir = tempdir().unwrap();
    let corpus = Corpus::parse("tiny", CONLLU.as_bytes(), posseq::CorpusFormat::Conllu).unwrap();
    let mut session = Session::new(&corpus);
    let save_path = dir.path().join("saved");

    let script = [
        ":add adj".to_string(),
        ":add noun".to_string(),
        ":find".to_string(),
        format!(":save {}", save_path.display()),
        ":reset".to_string(),
    ];

    let mut outcomes = Vec::new();
    for line in &script {
        for action in parse_line(line).unwrap() {
            outcomes.push(session.dispatch(action));
        }
    }

    assert!(matches!(outcomes[2], Outcome::Results { count: 3, .. }));
    assert!(matches!(outcomes[3], Outcome::Saved(_)));
    assert!(matches!(outcomes[4], Outcome::Cleared));
    assert_eq!(session.state(), SessionState::Empty);
    assert_eq!(
        fs::read_to_string(dir.path().join("saved.txt")).unwrap(),
        "big dog\nsmall cat\ntall dog\n"
    );

    assert!(matches!(
        session.dispatch(Action::AppendTag(Tag::Verb)),
        Outcome::Input { state: SessionState::TypingInvalid, .. }
    ));
}
