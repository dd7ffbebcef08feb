#[cfg(test)]
mod tests {
    use crate::connection::{SinkAdapter, TransportError};
    use crate::game::pebble::PassThePebble;
    use crate::registry::{generate_code, RoomRegistry};
    use crate::response::Outbound;
    use async_trait::async_trait;
    use std::collections::HashSet;

    struct NullSink;

    #[async_trait]
    impl SinkAdapter for NullSink {
        async fn send(&mut self, _payload: Outbound) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn registry() -> RoomRegistry<NullSink> {
        RoomRegistry::new()
    }

    #[test]
    fn test_generate_code_charset() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 4);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let registry = registry();
        let code = registry.create(Box::new(PassThePebble::new(2))).await;
        assert_eq!(code.len(), 4);
        assert_eq!(registry.len().await, 1);

        let room = registry.lookup(&code).await.expect("room not registered");
        assert_eq!(room.lock().await.code(), code);
        assert!(registry.lookup("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_codes_are_unique() {
        let registry = registry();
        let mut codes = HashSet::new();
        for _ in 0..50 {
            codes.insert(registry.create(Box::new(PassThePebble::new(1))).await);
        }
        assert_eq!(codes.len(), 50);
        assert_eq!(registry.len().await, 50);
    }

    #[tokio::test]
    async fn test_remove_if_empty() {
        let registry = registry();
        let code = registry.create(Box::new(PassThePebble::new(1))).await;

        // Occupied rooms survive.
        {
            let room = registry.lookup(&code).await.unwrap();
            room.lock().await.join("a".to_string(), NullSink);
        }
        assert!(!registry.remove_if_empty(&code).await);
        assert!(registry.lookup(&code).await.is_some());

        // Once the last connection is gone the room is deleted for good.
        {
            let room = registry.lookup(&code).await.unwrap();
            room.lock().await.leave("a").await;
        }
        assert!(registry.remove_if_empty(&code).await);
        assert!(registry.lookup(&code).await.is_none());
        assert!(registry.is_empty().await);

        assert!(!registry.remove_if_empty(&code).await);
    }
}
