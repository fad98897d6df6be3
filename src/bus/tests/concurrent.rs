//! Concurrent access: many producers against one destination.

#[cfg(test)]
mod tests {
    use crate::bus::{Payload, QueueManager};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn test_concurrent_senders_lose_no_items() {
        let bus = Arc::new(QueueManager::new());
        let sender_count = 8;
        let per_sender = 50;

        let mut tasks = JoinSet::new();
        for sender in 0..sender_count {
            let bus = Arc::clone(&bus);
            tasks.spawn(async move {
                for i in 0..per_sender {
                    let payload =
                        Payload::new("work", serde_json::json!({ "n": i }));
                    bus.send_default(&format!("sender-{sender}"), "sink", payload)
                        .unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let stats = bus.get_system_stats("sink");
        assert_eq!(stats.input_queue_size, sender_count * per_sender);

        let mut drained = 0;
        while bus.get_from_input_queue("sink").is_some() {
            drained += 1;
        }
        assert_eq!(drained, sender_count * per_sender);
    }

    #[tokio::test]
    async fn test_per_sender_order_preserved_under_concurrency() {
        // Interleaving across senders is arbitrary, but each sender's own
        // equal-priority items must drain in its send order.
        let bus = Arc::new(QueueManager::new());

        let mut tasks = JoinSet::new();
        for sender in 0..4 {
            let bus = Arc::clone(&bus);
            tasks.spawn(async move {
                for i in 0u64..100 {
                    let payload =
                        Payload::new("work", serde_json::json!({ "n": i }));
                    bus.send_default(&format!("sender-{sender}"), "sink", payload)
                        .unwrap();
                }
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap();
        }

        let mut last_seen: HashMap<String, u64> = HashMap::new();
        while let Some(item) = bus.get_from_input_queue("sink") {
            let n = item.payload.data["n"].as_u64().unwrap();
            if let Some(previous) = last_seen.insert(item.source.clone(), n) {
                assert!(
                    n > previous,
                    "items from {} drained out of order: {n} after {previous}",
                    item.source
                );
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_sender_and_consumer() {
        let bus = Arc::new(QueueManager::new());
        let total = 200;

        let producer_bus = Arc::clone(&bus);
        let producer = tokio::spawn(async move {
            for i in 0..total {
                let payload = Payload::new("work", serde_json::json!({ "n": i }));
                producer_bus.send_default("producer", "sink", payload).unwrap();
                if i % 32 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        });

        let consumer_bus = Arc::clone(&bus);
        let consumer = tokio::spawn(async move {
            let mut received = 0;
            while received < total {
                match consumer_bus.get_from_input_queue("sink") {
                    Some(_) => received += 1,
                    None => tokio::task::yield_now().await,
                }
            }
            received
        });

        producer.await.unwrap();
        let received = consumer.await.unwrap();
        assert_eq!(received, total);
        assert_eq!(bus.get_system_stats("sink").input_queue_size, 0);
    }
}
