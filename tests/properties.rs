//! Property tests for registration and delivery.

use observer_subject::{ObserverRef, ObserverResult, Subject};
use proptest::prelude::*;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<usize>>>;

fn observers(n: usize, log: &Log) -> Vec<Rc<impl Fn(&str, &Value) -> ObserverResult>> {
    (0..n)
        .map(|id| {
            let log = log.clone();
            Rc::new(move |_: &str, _: &Value| -> ObserverResult {
                log.borrow_mut().push(id);
                Ok(())
            })
        })
        .collect()
}

#[derive(Clone, Debug)]
enum Op {
    Register(usize),
    Unregister(usize),
}

fn op_strategy(observers: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..observers).prop_map(Op::Register),
        (0..observers).prop_map(Op::Unregister),
    ]
}

proptest! {
    #[test]
    fn prop_delivery_matches_model(ops in proptest::collection::vec(op_strategy(6), 0..40)) {
        let subject: Subject = Subject::new();
        let log = Log::default();
        let owned = observers(6, &log);
        let handles: Vec<ObserverRef> = owned.iter().map(ObserverRef::new).collect();

        // Reference model: ordered list without duplicates
        let mut model: Vec<usize> = Vec::new();
        for op in &ops {
            match *op {
                Op::Register(i) => {
                    let added = subject.register("t", &handles[i]).unwrap();
                    prop_assert_eq!(added, !model.contains(&i));
                    if added {
                        model.push(i);
                    }
                }
                Op::Unregister(i) => {
                    let removed = subject.unregister("t", &handles[i]).unwrap();
                    prop_assert_eq!(removed, model.contains(&i));
                    model.retain(|&m| m != i);
                }
            }
        }

        prop_assert_eq!(subject.observer_count("t"), model.len());
        prop_assert_eq!(subject.has_topic("t"), !model.is_empty());

        let delivered = subject.notify("t", &Value::Null).unwrap();
        prop_assert_eq!(delivered, model.len());
        prop_assert_eq!(log.borrow().clone(), model);
    }

    #[test]
    fn prop_register_is_idempotent(topic in "[a-z]{1,12}", repeats in 1usize..8) {
        let subject: Subject = Subject::new();
        let log = Log::default();
        let owned = observers(1, &log);
        let handle = ObserverRef::new(&owned[0]);

        for _ in 0..repeats {
            subject.register(&topic, &handle).unwrap();
        }
        prop_assert_eq!(subject.observer_count(&topic), 1);

        subject.notify(&topic, &Value::Null).unwrap();
        prop_assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn prop_register_then_unregister_never_delivers(
        topic in "[a-z]{1,12}",
        payload in any::<i64>(),
    ) {
        let subject: Subject = Subject::new();
        let log = Log::default();
        let owned = observers(1, &log);
        let handle = ObserverRef::new(&owned[0]);

        subject.register(&topic, &handle).unwrap();
        subject.unregister(&topic, &handle).unwrap();

        prop_assert_eq!(subject.notify(&topic, &Value::from(payload)).unwrap(), 0);
        prop_assert!(log.borrow().is_empty());
        prop_assert_eq!(subject.topic_count(), 0);
    }

    #[test]
    fn prop_topics_are_isolated(
        topics in proptest::collection::hash_set("[a-z]{1,6}", 1..6),
    ) {
        let topics: Vec<String> = topics.into_iter().collect();
        let subject: Subject = Subject::new();
        let log = Log::default();
        let owned = observers(topics.len(), &log);

        for (i, topic) in topics.iter().enumerate() {
            subject.register(topic, &ObserverRef::new(&owned[i])).unwrap();
        }

        for (i, topic) in topics.iter().enumerate() {
            log.borrow_mut().clear();
            subject.notify(topic, &Value::Null).unwrap();
            prop_assert_eq!(log.borrow().clone(), vec![i]);
        }
    }
}
