//! Ordering guarantees: priority first, FIFO within a priority class.

#[cfg(test)]
mod tests {
    use crate::bus::{Payload, QueueManager, DEFAULT_PRIORITY};

    fn payload(tag: &str) -> Payload {
        Payload::new("test", serde_json::json!({ "tag": tag }))
    }

    #[test]
    fn test_fifo_for_equal_priority_sends() {
        let bus = QueueManager::new();

        let first = bus.send_default("a", "sys", payload("first")).unwrap();
        let second = bus.send_default("a", "sys", payload("second")).unwrap();
        let third = bus.send_default("a", "sys", payload("third")).unwrap();

        assert_eq!(bus.get_from_input_queue("sys").unwrap().id, first);
        assert_eq!(bus.get_from_input_queue("sys").unwrap().id, second);
        assert_eq!(bus.get_from_input_queue("sys").unwrap().id, third);
        assert!(bus.get_from_input_queue("sys").is_none());
    }

    #[test]
    fn test_late_high_priority_item_served_first() {
        let bus = QueueManager::new();

        bus.send_to_system("a", "sys", payload("low"), 1).unwrap();
        bus.send_to_system("a", "sys", payload("low"), 1).unwrap();
        let urgent = bus.send_to_system("a", "sys", payload("urgent"), 9).unwrap();

        assert_eq!(bus.get_from_input_queue("sys").unwrap().id, urgent);
    }

    #[test]
    fn test_priority_nine_jumps_five_equal_priority_items() {
        // Five items at priority 5, then one at priority 9: the first
        // receive returns the priority-9 item, the next five return the
        // priority-5 items in send order, the seventh returns None.
        let bus = QueueManager::new();

        let mut bulk_ids = Vec::new();
        for i in 0..5 {
            let id = bus
                .send_to_system("a", "sys", payload(&format!("bulk-{i}")), 5)
                .unwrap();
            bulk_ids.push(id);
        }
        let urgent = bus.send_to_system("a", "sys", payload("urgent"), 9).unwrap();

        assert_eq!(bus.get_from_input_queue("sys").unwrap().id, urgent);
        for expected in &bulk_ids {
            assert_eq!(&bus.get_from_input_queue("sys").unwrap().id, expected);
        }
        assert!(bus.get_from_input_queue("sys").is_none());
    }

    #[test]
    fn test_default_priority_applied_by_send_default() {
        let bus = QueueManager::new();
        bus.send_default("a", "sys", payload("x")).unwrap();

        let item = bus.get_from_input_queue("sys").unwrap();
        assert_eq!(item.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_item_ids_are_unique() {
        let bus = QueueManager::new();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..100 {
            let id = bus.send_default("a", "sys", payload("x")).unwrap();
            assert!(ids.insert(id), "item ids must be unique");
        }
    }

    #[test]
    fn test_envelope_fields_populated_at_send() {
        let bus = QueueManager::new();
        bus.send_to_system("ai_backend", "game_engine", payload("move"), 7)
            .unwrap();

        let item = bus.get_from_input_queue("game_engine").unwrap();
        assert_eq!(item.source, "ai_backend");
        assert_eq!(item.destination, "game_engine");
        assert_eq!(item.priority, 7);
        assert_eq!(item.payload.kind, "test");
        assert!(item.metadata.is_empty());
        assert!(item.error_annotation().is_none());
    }
}
