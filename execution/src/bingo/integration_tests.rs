//! Integration tests for bingo table execution.
//!
//! These tests drive a [Session] through whole rounds (request, draw,
//! settle) and check the accounting across them.

#[cfg(test)]
mod tests {
    use crate::bingo::payout::{accumulate, base_payout};
    use crate::mocks::{create_seed, RecordingSink};
    use crate::{evaluate, BingoError, EventSink, GameRng, Session, SessionConfig};
    use bingo_types::bingo::{
        DrawnNumbers, Event, SessionSnapshot, CHIP_FRACTION, JACKPOT_SEED, JACKPOT_THRESHOLD,
        MAX_BALL,
    };
    use commonware_codec::{DecodeExt, Encode};

    fn open_table(seed: u64, card_count: u8) -> (Session, GameRng) {
        let seed = create_seed(seed);
        let mut rng = GameRng::new(&seed, 1, 0);
        let session = Session::new(
            SessionConfig {
                card_count,
                ..SessionConfig::default()
            },
            &mut rng,
        )
        .expect("valid config");
        (session, rng)
    }

    /// Draw until the round ends, forwarding every event to `sink`.
    fn play_round(session: &mut Session, rng: &mut GameRng, sink: &mut impl EventSink) {
        sink.emit_all(&session.start_round().expect("round starts"));
        while session.is_playing() {
            assert!(session.request_draw().expect("round active"));
            sink.emit_all(&session.complete_draw(rng).expect("draw completes"));
        }
    }

    #[test]
    fn test_same_seed_replays_identically() {
        let run = |seed| {
            let (mut session, mut rng) = open_table(seed, 3);
            let mut sink = RecordingSink::default();
            for _ in 0..3 {
                play_round(&mut session, &mut rng, &mut sink);
            }
            (session.snapshot(), sink.events)
        };

        let (first_snapshot, first_events) = run(42);
        let (second_snapshot, second_events) = run(42);
        assert_eq!(first_snapshot, second_snapshot);
        assert_eq!(first_events, second_events);

        let (other_snapshot, _) = run(43);
        assert_ne!(first_snapshot.cards, other_snapshot.cards);
    }

    #[test]
    fn test_round_ends_on_first_bingo() {
        for seed in 0..20 {
            let (mut session, mut rng) = open_table(seed, 2);
            let mut sink = RecordingSink::default();
            play_round(&mut session, &mut rng, &mut sink);

            let drawn = session.drawn().as_slice().to_vec();
            assert!(!drawn.is_empty() && drawn.len() <= MAX_BALL as usize);
            assert_eq!(sink.balls(), drawn);

            // Every card is covered by the time the machine is empty
            assert_eq!(
                sink.count(|e| matches!(e, Event::RoundExhausted { .. })),
                0
            );
            let winners = evaluate(session.cards(), session.drawn());
            assert!(!winners.is_empty());
            assert_eq!(session.winners(), winners.as_slice());

            // One ball earlier nobody had won
            let before = DrawnNumbers::try_from(&drawn[..drawn.len() - 1]).unwrap();
            assert!(evaluate(session.cards(), &before).is_empty());

            let last = sink.events.last().unwrap();
            assert!(matches!(
                last,
                Event::Win { .. } | Event::Jackpot { .. }
            ));
        }
    }

    #[test]
    fn test_balance_and_jackpot_accounting() {
        for seed in 0..20 {
            let (mut session, mut rng) = open_table(seed, 4);
            let balance = session.balance();
            let stake = session.stake();
            let (jackpot, _) =
                accumulate(session.jackpot(), session.jackpot_fraction(), session.bet(), 4);

            let mut sink = RecordingSink::default();
            play_round(&mut session, &mut rng, &mut sink);

            let draw_count = session.drawn().len();
            let base = base_payout(session.bet(), session.multiplier(), session.winners().len());
            match sink.events.last().unwrap() {
                Event::Jackpot {
                    payout,
                    jackpot_awarded,
                    draw_count: reported,
                    ..
                } => {
                    assert!(draw_count <= JACKPOT_THRESHOLD as usize);
                    assert_eq!(*reported as usize, draw_count);
                    assert_eq!(*jackpot_awarded, jackpot);
                    assert_eq!(*payout, base + jackpot);
                    assert_eq!(session.jackpot(), JACKPOT_SEED);
                }
                Event::Win {
                    payout,
                    draw_count: reported,
                    ..
                } => {
                    assert!(draw_count > JACKPOT_THRESHOLD as usize);
                    assert_eq!(*reported as usize, draw_count);
                    assert_eq!(*payout, base);
                    assert_eq!(session.jackpot(), jackpot);
                }
                other => panic!("unexpected final event {:?}", other),
            }
            assert_eq!(session.balance(), balance - stake + session.last_win());
        }
    }

    #[test]
    fn test_jackpot_grows_with_every_stake() {
        let (mut session, _) = open_table(7, 10);

        // 10 cards at 10 chips: 100 staked, 10 to the jackpot
        for round in 1..=5u64 {
            session.start_round().unwrap();
            assert_eq!(session.jackpot(), JACKPOT_SEED + round * 10);
            assert_eq!(session.balance(), 1_000 - round * 100);
            session.abort_round();
        }
    }

    #[test]
    fn test_small_bets_feed_the_jackpot() {
        let seed = create_seed(8);
        let mut rng = GameRng::new(&seed, 1, 0);
        let mut session = Session::new(
            SessionConfig {
                bet: 5,
                ..SessionConfig::default()
            },
            &mut rng,
        )
        .unwrap();

        // Half a chip per round
        session.start_round().unwrap();
        session.abort_round();
        assert_eq!(session.jackpot(), JACKPOT_SEED);
        assert_eq!(session.jackpot_fraction(), CHIP_FRACTION / 2);
        assert_eq!(session.snapshot().jackpot_fraction as u64, CHIP_FRACTION / 2);

        for _ in 1..10 {
            session.start_round().unwrap();
            session.abort_round();
        }
        assert_eq!(session.jackpot(), JACKPOT_SEED + 5);
        assert_eq!(session.jackpot_fraction(), 0);

        // 1.5 chips per round
        session.set_bet(15).unwrap();
        for _ in 0..10 {
            session.start_round().unwrap();
            session.abort_round();
        }
        assert_eq!(session.jackpot(), JACKPOT_SEED + 5 + 15);
        assert_eq!(session.balance(), 1_000 - 10 * 5 - 10 * 15);
    }

    #[test]
    fn test_broke_player_cannot_start() {
        let seed = create_seed(9);
        let mut rng = GameRng::new(&seed, 1, 0);
        let mut session = Session::new(
            SessionConfig {
                starting_balance: 15,
                ..SessionConfig::default()
            },
            &mut rng,
        )
        .unwrap();

        session.start_round().unwrap();
        session.abort_round();
        assert_eq!(session.balance(), 5);

        let snapshot = session.snapshot();
        assert_eq!(
            session.start_round(),
            Err(BingoError::InsufficientBalance {
                balance: 5,
                required: 10
            })
        );
        assert_eq!(session.snapshot(), snapshot);
    }

    #[test]
    fn test_switching_cards_mid_round() {
        let (mut session, mut rng) = open_table(11, 1);
        session.start_round().unwrap();
        // Three balls can never complete a pattern
        for _ in 0..3 {
            session.request_draw().unwrap();
            session.complete_draw(&mut rng).unwrap();
        }
        assert!(session.is_playing());
        let balance = session.balance();
        let jackpot = session.jackpot();

        let events = session.set_card_count(2, &mut rng).unwrap();
        assert!(matches!(events.last(), Some(Event::CardsDealt { card_count: 2, .. })));
        assert_eq!(session.cards().len(), 2);
        assert_eq!(session.multiplier(), 2.0);
        assert_eq!(session.balance(), balance);
        assert_eq!(session.jackpot(), jackpot);
        assert!(session.drawn().is_empty());
        assert_eq!(session.request_draw(), Err(BingoError::NoActiveRound));

        // The next round is charged for both cards
        session.start_round().unwrap();
        assert_eq!(session.balance(), balance - 20);
    }

    #[test]
    fn test_held_draw_button_draws_one_ball() {
        let (mut session, mut rng) = open_table(13, 1);
        session.start_round().unwrap();

        let admitted = (0..10)
            .filter(|_| session.request_draw().unwrap())
            .count();
        assert_eq!(admitted, 1);
        session.complete_draw(&mut rng).unwrap();
        assert_eq!(session.drawn().len(), 1);
    }

    #[test]
    fn test_snapshot_survives_encoding() {
        let (mut session, mut rng) = open_table(17, 3);
        session.start_round().unwrap();
        for _ in 0..5 {
            session.request_draw().unwrap();
            session.complete_draw(&mut rng).unwrap();
            if !session.is_playing() {
                break;
            }
        }

        let snapshot = session.snapshot();
        let decoded =
            SessionSnapshot::decode(snapshot.encode().as_ref()).expect("snapshot decode failed");
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.drawn.as_slice(), session.drawn().as_slice());
    }
}
