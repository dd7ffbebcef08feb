#[cfg(test)]
mod tests {
    use crate::game::{Game, GameError, Player, Roster};
    use serde_json::{json, Value};

    // Minimal Game implementation: no rules, just the roster plumbing.
    struct TrivialGame {
        roster: Roster,
        current_index: usize,
    }

    impl TrivialGame {
        fn new(seats: usize) -> Self {
            TrivialGame {
                roster: Roster::with_seats(seats),
                current_index: 0,
            }
        }
    }

    impl Game for TrivialGame {
        fn roster(&self) -> &Roster {
            &self.roster
        }

        fn roster_mut(&mut self) -> &mut Roster {
            &mut self.roster
        }

        fn public_state(&self) -> Value {
            json!({})
        }

        fn private_state(&self, _client_id: &str) -> Value {
            json!({})
        }

        fn submit_action(
            &mut self,
            _client_id: &str,
            _action: &Value,
            _force_turn_for: Option<&str>,
        ) -> Result<(), GameError> {
            Ok(())
        }

        fn current_player(&self) -> Option<String> {
            self.roster
                .client_at(self.current_index)
                .map(str::to_string)
        }

        fn is_game_over(&self) -> bool {
            false
        }

        fn final_result(&self) -> Value {
            json!({})
        }
    }

    fn claim(roster: &mut Roster, slot: usize, client_id: &str) {
        roster.player_mut(slot).unwrap().client_id = Some(client_id.to_string());
    }

    #[test]
    fn test_roster_seats_indexed_from_zero() {
        for seats in 1..=5 {
            let roster = Roster::with_seats(seats);
            assert_eq!(roster.seat_count(), seats);
            for slot in 0..seats {
                let player = roster.player(slot).unwrap();
                assert_eq!(player.slot_index, slot);
                assert_eq!(player.display_name, format!("Player {slot}"));
                assert_eq!(player.client_id, None);
            }
        }
    }

    #[test]
    fn test_player_defaults() {
        let player = Player::new(3);
        assert_eq!(player.slot_index, 3);
        assert_eq!(player.display_name, "Player 3");
        assert!(player.client_id.is_none());
    }

    #[test]
    fn test_slot_of_and_client_at() {
        let mut roster = Roster::with_seats(2);
        assert_eq!(roster.slot_of("foo"), None);
        assert_eq!(roster.client_at(0), None);

        claim(&mut roster, 1, "foo");
        assert_eq!(roster.slot_of("foo"), Some(1));
        assert_eq!(roster.client_at(1), Some("foo"));
        assert_eq!(roster.client_at(0), None);
    }

    #[test]
    fn test_availability_and_names() {
        let mut roster = Roster::with_seats(2);
        claim(&mut roster, 0, "foo");

        let availability = roster.availability();
        assert_eq!(availability[&0], false);
        assert_eq!(availability[&1], true);

        let names = roster.names();
        assert_eq!(names[&0], Some("Player 0".to_string()));
        assert_eq!(names[&1], None);
    }

    #[test]
    fn test_any_seat_claimed() {
        let mut roster = Roster::with_seats(2);
        assert!(!roster.any_seat_claimed());
        claim(&mut roster, 1, "foo");
        assert!(roster.any_seat_claimed());
    }

    #[test]
    fn test_start_game_requires_a_player() {
        let mut game = TrivialGame::new(1);
        assert_eq!(game.start_game(), Err(GameError::NoPlayersConnected));
        assert!(!game.roster().is_started());
    }

    #[test]
    fn test_start_game_is_monotonic() {
        let mut game = TrivialGame::new(1);
        claim(game.roster_mut(), 0, "foo");

        let state = game.start_game().unwrap();
        assert_eq!(state, json!({}));
        assert!(game.roster().is_started());

        assert_eq!(game.start_game(), Err(GameError::AlreadyStarted));
        assert!(game.roster().is_started());
    }

    #[test]
    fn test_manager_is_cleared_not_reassigned() {
        let mut roster = Roster::with_seats(1);
        assert_eq!(roster.manager(), None);
        roster.set_manager(Some("foo".to_string()));
        assert_eq!(roster.manager(), Some("foo"));
        roster.set_manager(None);
        assert_eq!(roster.manager(), None);
    }

    #[test]
    fn test_game_error_messages() {
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn!");
        assert_eq!(GameError::InvalidAction.to_string(), "Invalid action");
        assert_eq!(GameError::AlreadyStarted.to_string(), "Game already started");
        assert_eq!(
            GameError::NoPlayersConnected.to_string(),
            "Cannot start game with no players"
        );
        assert_eq!(
            GameError::NotManager.to_string(),
            "Only the manager can start the game"
        );
    }
}
