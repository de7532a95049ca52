use formwire::{
    Entry, FieldErrors, Form, FormValue, Path, Submission, Value, decode, encode, from_value,
    to_value,
};

fn assert_roundtrips<T: FormValue + PartialEq + std::fmt::Debug>(
    value: &T,
    entries: &[(&str, &str)],
) {
    let encoded = encode(&to_value(value)).unwrap();
    let expected: Vec<Entry> = entries.iter().copied().map(Entry::from).collect();
    assert_eq!(encoded, expected);

    let decoded = decode(encoded).unwrap();
    assert_eq!(from_value::<T>(&decoded).as_ref(), Ok(value));
}

fn error_names(errors: &FieldErrors) -> Vec<String> {
    errors.iter().map(|(p, _)| p.to_string()).collect()
}

#[test]
fn test_simple_struct() {
    #[derive(Debug, PartialEq, Form)]
    struct Login {
        email: String,
        password: String,
        remember: bool,
    }

    assert_roundtrips(
        &Login {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
            remember: true,
        },
        &[
            ("email", "ada@example.com"),
            ("password", "hunter2"),
            ("remember", "on"),
        ],
    );

    assert_roundtrips(
        &Login {
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
            remember: false,
        },
        &[("email", "ada@example.com"), ("password", "hunter2")],
    );
}

#[derive(Debug, PartialEq, Form)]
struct Todo {
    content: String,
    complete: bool,
}

#[derive(Debug, PartialEq, Form)]
struct TodoList {
    title: String,
    #[form(rename = "todo")]
    todos: Vec<Todo>,
}

#[test]
fn test_nested_list() {
    assert_roundtrips(
        &TodoList {
            title: "Groceries".to_string(),
            todos: vec![
                Todo {
                    content: "Buy milk".to_string(),
                    complete: true,
                },
                Todo {
                    content: "Buy eggs".to_string(),
                    complete: false,
                },
            ],
        },
        &[
            ("title", "Groceries"),
            ("todo[0].content", "Buy milk"),
            ("todo[0].complete", "on"),
            ("todo[1].content", "Buy eggs"),
        ],
    );
}

#[test]
fn test_errors_are_collected_per_path() {
    let value = decode([
        ("title", ""),
        ("todo[0].content", "Buy milk"),
        ("todo[1].complete", "on"),
        ("todo[2].content", ""),
    ])
    .unwrap();

    let errors = from_value::<TodoList>(&value).unwrap_err();
    assert_eq!(
        error_names(&errors),
        ["title", "todo[1].content", "todo[2].content"]
    );
    assert_eq!(
        errors.get(&Path::parse("todo[2].content").unwrap()),
        ["required"]
    );
    assert!(errors.is_invalid(&Path::parse("todo").unwrap()));
    assert!(!errors.is_invalid(&Path::parse("todo[0]").unwrap()));
}

#[test]
fn test_missing_nested_object_reports_leaves() {
    #[derive(Debug, PartialEq, Form)]
    struct Address {
        street: String,
        city: String,
    }

    #[derive(Debug, PartialEq, Form)]
    struct Signup {
        name: String,
        address: Address,
    }

    let value = decode([("name", "Ada")]).unwrap();
    let errors = from_value::<Signup>(&value).unwrap_err();
    assert_eq!(error_names(&errors), ["address.street", "address.city"]);

    let value = decode([("name", "Ada"), ("address", "somewhere")]).unwrap();
    let errors = from_value::<Signup>(&value).unwrap_err();
    assert_eq!(
        errors.get(&Path::field("address")),
        ["expected object, got scalar"]
    );
}

#[test]
fn test_optional_fields() {
    #[derive(Debug, PartialEq, Form)]
    struct Profile {
        name: String,
        age: Option<u32>,
        #[form(rename = "nick-name")]
        nickname: Option<String>,
    }

    assert_roundtrips(
        &Profile {
            name: "Ada".to_string(),
            age: Some(36),
            nickname: Some("countess".to_string()),
        },
        &[("name", "Ada"), ("age", "36"), ("nick-name", "countess")],
    );

    assert_roundtrips(
        &Profile {
            name: "Ada".to_string(),
            age: None,
            nickname: None,
        },
        &[("name", "Ada")],
    );

    let value = decode([("name", "Ada"), ("age", ""), ("nick-name", "")]).unwrap();
    assert_eq!(
        from_value::<Profile>(&value),
        Ok(Profile {
            name: "Ada".to_string(),
            age: None,
            nickname: None,
        })
    );

    let value = decode([("name", "Ada"), ("age", "old")]).unwrap();
    let errors = from_value::<Profile>(&value).unwrap_err();
    assert_eq!(errors.get(&Path::field("age")), ["invalid number \"old\""]);
}

#[test]
fn test_skip_field() {
    #[derive(Debug, PartialEq, Form)]
    struct WithSkip {
        included: u32,
        #[form(skip)]
        skipped: String,
    }

    let value = WithSkip {
        included: 42,
        skipped: "not submitted".to_string(),
    };
    let entries = encode(&to_value(&value)).unwrap();
    assert_eq!(entries, vec![Entry::new("included", "42")]);

    let parsed: WithSkip = from_value(&decode(entries).unwrap()).unwrap();
    assert_eq!(parsed.included, 42);
    assert_eq!(parsed.skipped, "");
}

#[test]
fn test_multi_select() {
    #[derive(Debug, PartialEq, Form)]
    struct Filter {
        tag: Vec<String>,
    }

    let value = decode([("tag", "red"), ("tag", "blue")]).unwrap();
    assert_eq!(
        from_value::<Filter>(&value),
        Ok(Filter {
            tag: vec!["red".to_string(), "blue".to_string()],
        })
    );

    let value = decode([("tag", "red")]).unwrap();
    assert_eq!(
        from_value::<Filter>(&value),
        Ok(Filter {
            tag: vec!["red".to_string()],
        })
    );

    assert_eq!(
        from_value::<Filter>(&Value::object()),
        Ok(Filter { tag: vec![] })
    );
}

#[test]
fn test_list_with_empty_elements() {
    #[derive(Debug, PartialEq, Form)]
    struct Readings {
        n: Vec<Option<u32>>,
        seen: Vec<bool>,
    }

    assert_roundtrips(
        &Readings {
            n: vec![Some(1), None, Some(3)],
            seen: vec![false, true],
        },
        &[
            ("n[0]", "1"),
            ("n[1]", ""),
            ("n[2]", "3"),
            ("seen[0]", ""),
            ("seen[1]", "on"),
        ],
    );
}

#[test]
fn test_parse_with_unknown_fields() {
    #[derive(Debug, PartialEq, Form)]
    struct Partial {
        a: u32,
    }

    let value = decode([("a", "1"), ("b", "2"), ("c[0].d", "3")]).unwrap();
    assert_eq!(from_value::<Partial>(&value), Ok(Partial { a: 1 }));
}

#[test]
fn test_choice_enum() {
    #[derive(Debug, PartialEq, Form)]
    enum Priority {
        #[form(rename = "low")]
        Low,
        #[form(rename = "high")]
        High,
        Urgent,
    }

    #[derive(Debug, PartialEq, Form)]
    struct Task {
        priority: Priority,
        fallback: Option<Priority>,
    }

    assert_roundtrips(
        &Task {
            priority: Priority::High,
            fallback: Some(Priority::Urgent),
        },
        &[("priority", "high"), ("fallback", "Urgent")],
    );

    let value = decode([("priority", "medium")]).unwrap();
    let errors = from_value::<Task>(&value).unwrap_err();
    assert_eq!(
        errors.get(&Path::field("priority")),
        ["invalid choice \"medium\""]
    );

    let value = decode([("priority", "low")]).unwrap();
    assert_eq!(
        from_value::<Task>(&value),
        Ok(Task {
            priority: Priority::Low,
            fallback: None,
        })
    );
}

#[test]
fn test_raw_identifier_field() {
    #[derive(Debug, PartialEq, Form)]
    struct Item {
        r#type: String,
    }

    assert_roundtrips(
        &Item {
            r#type: "book".to_string(),
        },
        &[("type", "book")],
    );
}

#[test]
fn test_generic_struct() {
    #[derive(Debug, PartialEq, Form)]
    struct Labeled<T> {
        label: String,
        inner: T,
    }

    assert_roundtrips(
        &Labeled {
            label: "due".to_string(),
            inner: vec![3u32, 4],
        },
        &[("label", "due"), ("inner[0]", "3"), ("inner[1]", "4")],
    );

    assert_roundtrips(
        &Labeled {
            label: "todo".to_string(),
            inner: Todo {
                content: "Buy milk".to_string(),
                complete: true,
            },
        },
        &[
            ("label", "todo"),
            ("inner.content", "Buy milk"),
            ("inner.complete", "on"),
        ],
    );
}

#[test]
fn test_append_blank_row() {
    let submission = Submission::parse([
        ("title", "Groceries"),
        ("todo[0].content", "Buy milk"),
        ("__intent__", "append/todo?"),
    ])
    .unwrap();

    let state = submission.reply(FieldErrors::new()).unwrap();
    let errors = from_value::<TodoList>(&state.value).unwrap_err();
    assert_eq!(error_names(&errors), ["todo[1].content"]);
    assert_eq!(
        errors.get(&Path::parse("todo[1].content").unwrap()),
        ["required"]
    );
}

#[test]
fn test_intent_then_typed_read() {
    let submission = Submission::parse([
        ("title", "Groceries"),
        ("todo[0].content", "Buy milk"),
        ("__intent__", "append/todo?value.content=Buy+eggs"),
    ])
    .unwrap();
    assert!(submission.is_intent());

    let state = submission.reply(FieldErrors::new()).unwrap();
    let list: TodoList = from_value(&state.value).unwrap();
    assert_eq!(
        list.todos,
        vec![
            Todo {
                content: "Buy milk".to_string(),
                complete: false,
            },
            Todo {
                content: "Buy eggs".to_string(),
                complete: false,
            },
        ]
    );
}

#[cfg(feature = "chrono")]
#[test]
fn test_chrono_date() {
    use chrono::NaiveDate;

    #[derive(Debug, PartialEq, Form)]
    struct Event {
        date: NaiveDate,
    }

    assert_roundtrips(
        &Event {
            date: NaiveDate::from_ymd_opt(2009, 2, 13).unwrap(),
        },
        &[("date", "2009-02-13")],
    );

    let value = decode([("date", "13/02/2009")]).unwrap();
    let errors = from_value::<Event>(&value).unwrap_err();
    assert_eq!(
        errors.get(&Path::field("date")),
        ["invalid date \"13/02/2009\""]
    );
}

#[cfg(feature = "smallvec")]
#[test]
fn test_smallvec() {
    use smallvec::{SmallVec, smallvec};

    #[derive(Debug, PartialEq, Form)]
    struct Scores {
        score: SmallVec<[u32; 4]>,
    }

    assert_roundtrips(
        &Scores {
            score: smallvec![3, 1, 4],
        },
        &[("score[0]", "3"), ("score[1]", "1"), ("score[2]", "4")],
    );
}
