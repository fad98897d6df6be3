//! Registration semantics: idempotence, auto-registration, unknown lookups.

#[cfg(test)]
mod tests {
    use crate::bus::{Payload, QueueManager, SystemStats};

    #[test]
    fn test_registration_is_idempotent() {
        let bus = QueueManager::new();

        bus.register_system("engine");
        bus.send_default("a", "engine", Payload::empty("x")).unwrap();
        bus.record_processed("engine");

        // Re-registering must not disturb queues or counters
        bus.register_system("engine");

        assert_eq!(bus.system_count(), 1);
        let stats = bus.get_system_stats("engine");
        assert_eq!(stats.input_queue_size, 1);
        assert_eq!(stats.processed, 1);
    }

    #[test]
    fn test_send_auto_registers_unknown_destination() {
        let bus = QueueManager::new();
        assert_eq!(bus.system_count(), 0);

        bus.send_default("a", "newcomer", Payload::empty("x")).unwrap();

        assert!(bus.registered_systems().contains(&"newcomer".to_string()));
        let stats = bus.get_system_stats("newcomer");
        assert_eq!(stats.input_queue_size, 1);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.output_queue_size, 0);
        assert_eq!(stats.error_queue_size, 0);
    }

    #[test]
    fn test_unknown_system_stats_are_zero_valued() {
        let bus = QueueManager::new();

        let stats = bus.get_system_stats("ghost");
        assert_eq!(stats, SystemStats::default());
        assert_eq!(stats.idle_time.as_secs(), 0);
    }

    #[test]
    fn test_gets_from_unknown_system_return_none() {
        let bus = QueueManager::new();

        assert!(bus.get_from_input_queue("ghost").is_none());
        assert!(bus.get_from_output_queue("ghost").is_none());
        assert!(bus.get_from_error_queue("ghost").is_none());
        // None of the lookups should have registered the name
        assert_eq!(bus.system_count(), 0);
    }

    #[test]
    fn test_registered_system_starts_empty() {
        let bus = QueueManager::new();
        bus.register_system("fresh");

        let stats = bus.get_system_stats("fresh");
        assert_eq!(stats.input_queue_size, 0);
        assert_eq!(stats.output_queue_size, 0);
        assert_eq!(stats.error_queue_size, 0);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.errors, 0);
    }
}
