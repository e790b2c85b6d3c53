use super::*;

const TTL: Duration = Duration::from_secs(3);

fn messages(queue: &NotificationQueue) -> Vec<&str> {
    queue.iter().map(|n| n.message.as_str()).collect()
}

#[test]
fn presence_maps_to_kind() {
    assert_eq!(NotificationKind::from(Presence::Joined), NotificationKind::Success);
    assert_eq!(NotificationKind::from(Presence::Left), NotificationKind::Failure);
}

#[tokio::test(start_paused = true)]
async fn items_keep_fifo_order() {
    let mut queue = NotificationQueue::new(TTL);
    let now = Instant::now();
    queue.enqueue_at("alice", NotificationKind::Success, now);
    queue.enqueue_at("bob", NotificationKind::Failure, now);
    queue.enqueue_at("alice", NotificationKind::Success, now);

    assert_eq!(messages(&queue), ["alice", "bob", "alice"]);
}

#[tokio::test(start_paused = true)]
async fn each_item_expires_on_its_own_deadline() {
    let mut queue = NotificationQueue::new(TTL);
    let start = Instant::now();
    queue.enqueue_at("first", NotificationKind::Success, start);
    queue.enqueue_at("second", NotificationKind::Success, start + Duration::from_secs(1));

    assert!(queue.expire_at(start + Duration::from_millis(2999)).is_empty());

    let gone = queue.expire_at(start + TTL);
    assert_eq!(gone.len(), 1);
    assert_eq!(gone[0].message, "first");
    assert_eq!(messages(&queue), ["second"]);

    let gone = queue.expire_at(start + Duration::from_secs(4));
    assert_eq!(gone.len(), 1);
    assert_eq!(gone[0].message, "second");
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn next_expiry_evicts_in_real_time() {
    let mut queue = NotificationQueue::new(TTL);
    let start = Instant::now();
    queue.enqueue("first", NotificationKind::Success);
    tokio::time::advance(Duration::from_secs(1)).await;
    queue.enqueue("second", NotificationKind::Failure);

    let gone = queue.next_expiry().await;
    assert_eq!(gone[0].message, "first");
    assert_eq!(Instant::now() - start, TTL);

    let gone = queue.next_expiry().await;
    assert_eq!(gone[0].message, "second");
    assert_eq!(Instant::now() - start, Duration::from_secs(4));
    assert!(queue.is_empty());
}

#[tokio::test(start_paused = true)]
async fn empty_queue_never_expires() {
    let mut queue = NotificationQueue::new(TTL);
    let waited = tokio::time::timeout(Duration::from_secs(60), queue.next_expiry()).await;
    assert!(waited.is_err());
}

#[tokio::test(start_paused = true)]
async fn duplicates_are_kept() {
    let mut queue = NotificationQueue::new(TTL);
    queue.enqueue("same", NotificationKind::Success);
    queue.enqueue("same", NotificationKind::Success);
    assert_eq!(queue.len(), 2);
}
