use crate::core::errors::LedgerError;
use crate::core::models::FriendshipStatus;
use crate::tests::{create_test_service, test_user};
use uuid::Uuid;

#[tokio::test]
async fn request_then_accept_fulfills_the_edge() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;

    let pending = service.send_friend_request(alice.id, bob.id).await.unwrap();
    assert_eq!(pending.status, FriendshipStatus::Pending);
    assert!(!service.is_friend(alice.id, bob.id).await.unwrap());

    let fulfilled = service
        .accept_friend_request(bob.id, alice.id)
        .await
        .unwrap();
    assert_eq!(fulfilled.status, FriendshipStatus::Fulfilled);
    assert!(service.is_friend(alice.id, bob.id).await.unwrap());
    // The edge is symmetric.
    assert!(service.is_friend(bob.id, alice.id).await.unwrap());
}

#[tokio::test]
async fn requester_cannot_accept_their_own_request() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;

    service.send_friend_request(alice.id, bob.id).await.unwrap();
    let result = service.accept_friend_request(alice.id, bob.id).await;
    assert!(matches!(result, Err(LedgerError::NotRequestRecipient(id)) if id == alice.id));
}

#[tokio::test]
async fn duplicate_requests_are_rejected_in_both_directions() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;

    service.send_friend_request(alice.id, bob.id).await.unwrap();

    let result = service.send_friend_request(alice.id, bob.id).await;
    assert!(matches!(result, Err(LedgerError::RequestAlreadyPending(_, _))));
    let result = service.send_friend_request(bob.id, alice.id).await;
    assert!(matches!(result, Err(LedgerError::RequestAlreadyPending(_, _))));

    service
        .accept_friend_request(bob.id, alice.id)
        .await
        .unwrap();
    let result = service.send_friend_request(alice.id, bob.id).await;
    assert!(matches!(result, Err(LedgerError::AlreadyFriends(_, _))));
}

#[tokio::test]
async fn self_friendship_is_rejected() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let result = service.send_friend_request(alice.id, alice.id).await;
    assert!(matches!(result, Err(LedgerError::SelfTransaction)));
}

#[tokio::test]
async fn request_to_unknown_user_is_rejected() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let ghost = Uuid::new_v4();
    let result = service.send_friend_request(alice.id, ghost).await;
    assert!(matches!(result, Err(LedgerError::UserNotFound(id)) if id == ghost));
}

#[tokio::test]
async fn removal_severs_the_edge_for_both_sides() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;

    service.send_friend_request(alice.id, bob.id).await.unwrap();
    service
        .accept_friend_request(bob.id, alice.id)
        .await
        .unwrap();

    // Either side may remove, including the original recipient.
    service.remove_friend(bob.id, alice.id).await.unwrap();
    assert!(!service.is_friend(alice.id, bob.id).await.unwrap());

    let result = service.remove_friend(alice.id, bob.id).await;
    assert!(matches!(result, Err(LedgerError::FriendshipNotFound(_, _))));
}

#[tokio::test]
async fn friend_listing_only_shows_fulfilled_edges() {
    let (service, _) = create_test_service();
    let alice = test_user(&service, "Alice").await;
    let bob = test_user(&service, "Bob").await;
    let carol = test_user(&service, "Carol").await;

    service.send_friend_request(alice.id, bob.id).await.unwrap();
    service
        .accept_friend_request(bob.id, alice.id)
        .await
        .unwrap();
    // Carol's request stays pending.
    service.send_friend_request(carol.id, alice.id).await.unwrap();

    let friends = service.list_friends(alice.id).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, bob.id);
    assert_eq!(friends[0].name, "Bob");

    assert!(service.list_friends(carol.id).await.unwrap().is_empty());
}
