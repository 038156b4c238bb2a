use std::collections::HashSet;
use std::thread;

use tournament_engine::config::settings::AppConfig;
use tournament_engine::database::{self, DbPool, NewTournament, TournamentUpdate};
use tournament_engine::domain::{MatchView, PlayerView, Stage, SystemType};
use tournament_engine::errors::TournamentError;
use tournament_engine::services::Services;

fn setup() -> (Services, DbPool) {
    let pool = database::create_memory_pool().unwrap();
    {
        let conn = database::get_connection(&pool).unwrap();
        database::setup::initialize_schema(&conn).unwrap();
    }
    (Services::new(AppConfig::new(), pool.clone()), pool)
}

fn add_users(pool: &DbPool, ratings: &[f64]) -> Vec<i32> {
    let conn = database::get_connection(pool).unwrap();
    ratings
        .iter()
        .enumerate()
        .map(|(i, rating)| {
            database::users::insert_user(&conn, &format!("Player {}", i + 1), *rating)
                .unwrap()
                .id
        })
        .collect()
}

fn create(services: &Services, system_type: SystemType, rounds: i32, max_players: i32) -> i32 {
    services
        .tournaments
        .create_tournament(&NewTournament {
            name: "Club Championship".into(),
            system_type,
            min_players: 2,
            max_players,
            amount_of_rounds: rounds,
        })
        .unwrap()
        .tournament_id
}

/// Creates a tournament and registers one user per rating, in order.
fn start(
    services: &Services,
    pool: &DbPool,
    system_type: SystemType,
    ratings: &[f64],
    rounds: i32,
) -> (i32, Vec<i32>) {
    let tournament_id = create(services, system_type, rounds, 32);
    let players = add_users(pool, ratings)
        .into_iter()
        .map(|user_id| {
            services
                .tournaments
                .register_player(tournament_id, user_id)
                .unwrap()
                .player_id
        })
        .collect();
    (tournament_id, players)
}

fn next_round(services: &Services, tournament_id: i32) -> Vec<MatchView> {
    let round = services.tournaments.generate_next_round(tournament_id).unwrap();
    services
        .tournaments
        .matches_for_round(tournament_id, round)
        .unwrap()
}

fn play(services: &Services, matches: &[MatchView], result: f64) {
    for game in matches {
        services
            .matches
            .set_match_result(game.match_id, result)
            .unwrap();
    }
}

fn unordered(game: &MatchView) -> (i32, i32) {
    let white = game.white_player.player_id;
    let black = game.black_player.player_id;
    (white.min(black), white.max(black))
}

fn idle_players(players: &[i32], matches: &[MatchView]) -> Vec<i32> {
    players
        .iter()
        .copied()
        .filter(|id| {
            !matches.iter().any(|game| {
                game.white_player.player_id == *id || game.black_player.player_id == *id
            })
        })
        .collect()
}

fn roster(services: &Services, tournament_id: i32) -> Vec<PlayerView> {
    services.tournaments.players(tournament_id).unwrap()
}

#[test]
fn test_equal_players_exchange_twenty_points() {
    let (services, pool) = setup();
    let (tournament_id, _) = start(&services, &pool, SystemType::RoundRobin, &[1500.0, 1500.0], 1);
    {
        let conn = database::get_connection(&pool).unwrap();
        conn.execute("UPDATE players SET amount_of_matches = 30", []).unwrap();
    }

    let matches = next_round(&services, tournament_id);
    assert_eq!(matches.len(), 1);

    let view = services
        .matches
        .set_match_result(matches[0].match_id, 1.0)
        .unwrap();
    assert_eq!(view.result, Some(1.0));
    assert_eq!(view.white_player.standings.rating, 1520.0);
    assert_eq!(view.black_player.standings.rating, 1480.0);
    assert_eq!(view.white_player.standings.matches, 31);
    assert_eq!(view.white_player.standings.wins, 1);
    assert_eq!(view.black_player.standings.losses, 1);
    assert_eq!(view.white_player.standings.score, 1.0);
    assert_eq!(view.black_player.standings.score, 0.0);
}

#[test]
fn test_result_can_be_set_only_once() {
    let (services, pool) = setup();
    let ratings = [1600.0, 1500.0, 1400.0, 1300.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 3);
    let matches = next_round(&services, tournament_id);

    services
        .matches
        .set_match_result(matches[0].match_id, 0.5)
        .unwrap();

    for attempt in [0.5, 1.0, 0.0] {
        let err = services
            .matches
            .set_match_result(matches[0].match_id, attempt)
            .unwrap_err();
        assert!(matches!(
            err,
            TournamentError::MatchAlreadyHasResult { result, .. } if result == 0.5
        ));
    }

    let err = services
        .matches
        .set_match_result(matches[1].match_id, 0.7)
        .unwrap_err();
    assert!(matches!(err, TournamentError::IllegalArgument(_)));

    let err = services.matches.set_match_result(9_999, 1.0).unwrap_err();
    assert!(matches!(err, TournamentError::MatchNotFound(9_999)));
}

#[test]
fn test_round_robin_meets_everyone_once() {
    let (services, pool) = setup();
    let ratings = [1500.0, 1510.0, 1520.0, 1530.0, 1540.0, 1550.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::RoundRobin, &ratings, 5);

    let mut pairs = HashSet::new();
    for _ in 0..5 {
        let matches = next_round(&services, tournament_id);
        assert_eq!(matches.len(), 3);
        for game in &matches {
            assert!(pairs.insert(unordered(game)), "rematch {:?}", unordered(game));
        }
        play(&services, &matches, 0.5);
    }

    assert_eq!(pairs.len(), 6 * 5 / 2);
}

#[test]
fn test_round_robin_odd_roster_gives_each_player_one_bye() {
    let (services, pool) = setup();
    let ratings = [1500.0, 1500.0, 1500.0, 1500.0, 1500.0];
    let (tournament_id, players) = start(&services, &pool, SystemType::RoundRobin, &ratings, 5);

    let mut byes = HashSet::new();
    for _ in 0..5 {
        let matches = next_round(&services, tournament_id);
        assert_eq!(matches.len(), 2);
        let idle = idle_players(&players, &matches);
        assert_eq!(idle.len(), 1);
        assert!(byes.insert(idle[0]));
    }

    assert_eq!(byes.len(), 5);
    assert!(roster(&services, tournament_id)
        .iter()
        .all(|player| player.standings.had_bye && player.standings.score == 1.0));
}

#[test]
fn test_swiss_never_repeats_a_pairing() {
    let (services, pool) = setup();
    let ratings = [2000.0, 1900.0, 1800.0, 1700.0, 1600.0, 1500.0, 1400.0, 1300.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 4);

    let mut pairs = HashSet::new();
    for _ in 0..4 {
        let matches = next_round(&services, tournament_id);
        assert_eq!(matches.len(), 4);
        for game in &matches {
            assert!(pairs.insert(unordered(game)), "rematch {:?}", unordered(game));
        }
        play(&services, &matches, 1.0);
    }

    assert!(roster(&services, tournament_id)
        .iter()
        .all(|player| player.standings.color_balance.abs() <= 2));
}

#[test]
fn test_swiss_first_round_pairs_top_half_against_bottom_half() {
    let (services, pool) = setup();
    let ratings = [1400.0, 1700.0, 1500.0, 1600.0];
    let (tournament_id, players) = start(&services, &pool, SystemType::Swiss, &ratings, 3);

    let matches = next_round(&services, tournament_id);
    let pairings: Vec<(i32, i32)> = matches
        .iter()
        .map(|game| (game.white_player.player_id, game.black_player.player_id))
        .collect();

    // seeded 1700, 1600 | 1500, 1400
    assert_eq!(pairings, vec![(players[1], players[2]), (players[3], players[0])]);
}

#[test]
fn test_swiss_byes_go_to_different_players() {
    let (services, pool) = setup();
    let ratings = [1800.0, 1700.0, 1600.0, 1500.0, 1400.0];
    let (tournament_id, players) = start(&services, &pool, SystemType::Swiss, &ratings, 4);

    let mut byes = Vec::new();
    for _ in 0..4 {
        let matches = next_round(&services, tournament_id);
        assert_eq!(matches.len(), 2);
        let idle = idle_players(&players, &matches);
        assert_eq!(idle.len(), 1);
        assert!(!byes.contains(&idle[0]), "second bye for {}", idle[0]);
        byes.push(idle[0]);
        play(&services, &matches, 1.0);
    }

    // the lowest rated player sits out first
    assert_eq!(byes[0], players[4]);
}

#[test]
fn test_bye_scores_one_point_without_a_match() {
    let (services, pool) = setup();
    let ratings = [1800.0, 1700.0, 1600.0, 1500.0, 1400.0];
    let (tournament_id, players) = start(&services, &pool, SystemType::Swiss, &ratings, 3);

    let matches = next_round(&services, tournament_id);
    assert_eq!(idle_players(&players, &matches), vec![players[4]]);

    let byed = roster(&services, tournament_id)
        .into_iter()
        .find(|player| player.player_id == players[4])
        .unwrap();
    assert_eq!(byed.standings.score, 1.0);
    assert!(byed.standings.had_bye);
    assert_eq!(byed.standings.matches, 0);
    assert_eq!(byed.standings.color_balance, 0);
}

#[test]
fn test_infeasible_round_leaves_no_trace() {
    let (services, pool) = setup();
    let ratings = [1600.0, 1500.0, 1400.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 5);
    for _ in 0..3 {
        let matches = next_round(&services, tournament_id);
        play(&services, &matches, 0.5);
    }
    let before = roster(&services, tournament_id);

    // everyone has had a bye and the remaining two already met
    let err = services
        .tournaments
        .generate_next_round(tournament_id)
        .unwrap_err();
    assert!(matches!(err, TournamentError::NotEnoughPlayers { have: 2, need: 2 }));

    assert_eq!(roster(&services, tournament_id), before);
    assert_eq!(
        services.tournaments.tournament(tournament_id).unwrap().current_round,
        3
    );
}

#[test]
fn test_rollback_to_round_zero_restores_every_field() {
    let (services, pool) = setup();
    let ratings = [1700.0, 1600.0, 1500.0, 1400.0];
    let (tournament_id, players) = start(&services, &pool, SystemType::Swiss, &ratings, 3);
    let initial = roster(&services, tournament_id);

    let first = next_round(&services, tournament_id);
    play(&services, &first, 1.0);
    let second = next_round(&services, tournament_id);
    let after_second_pairing = roster(&services, tournament_id);
    play(&services, &second, 0.5);
    let third = next_round(&services, tournament_id);
    play(&services, &third, 0.0);

    assert_eq!(services.tournaments.rollback_round(tournament_id).unwrap(), 2);
    assert_eq!(roster(&services, tournament_id), after_second_pairing);
    assert!(services
        .tournaments
        .matches_for_round(tournament_id, 2)
        .unwrap()
        .iter()
        .all(|game| game.result.is_none()));
    assert!(services
        .tournaments
        .matches_for_round(tournament_id, 3)
        .unwrap()
        .is_empty());

    assert_eq!(services.tournaments.rollback_round(tournament_id).unwrap(), 1);
    assert_eq!(services.tournaments.rollback_round(tournament_id).unwrap(), 0);

    assert_eq!(roster(&services, tournament_id), initial);
    let tournament = services.tournaments.tournament(tournament_id).unwrap();
    assert_eq!(tournament.stage, Stage::Registration);
    assert_eq!(tournament.current_round, 0);
    assert!(services
        .tournaments
        .matches_for_round(tournament_id, 1)
        .unwrap()
        .is_empty());

    let conn = database::get_connection(&pool).unwrap();
    for player_id in players {
        assert!(database::histories::list_by_player(&conn, player_id)
            .unwrap()
            .is_empty());
    }
}

/// Pairs every round before the previous round's results come in, so each
/// round's result entries are newer than the next round's colour entries.
fn assert_late_results_roll_back_exactly(system_type: SystemType) {
    let (services, pool) = setup();
    let tournament_id = create(&services, system_type, 3, 32);
    let ratings = [2450.0, 2380.0, 1900.0, 1450.0, 1600.0];
    let experience = [45, 29, 12, 31, 0];
    let user_ids = add_users(&pool, &ratings);
    {
        let conn = database::get_connection(&pool).unwrap();
        for (user_id, matches) in user_ids.iter().zip(experience) {
            conn.execute(
                "UPDATE users SET amount_of_matches = ?1 WHERE id = ?2",
                (matches, user_id),
            )
            .unwrap();
        }
    }
    let count = if system_type == SystemType::Swiss { 4 } else { 5 };
    for user_id in &user_ids[..count] {
        services
            .tournaments
            .register_player(tournament_id, *user_id)
            .unwrap();
    }
    let initial = roster(&services, tournament_id);

    let outcomes = [1.0, 0.5, 0.0];
    let submit = |matches: &[MatchView]| {
        for (game, result) in matches.iter().zip(outcomes.iter().cycle()) {
            services
                .matches
                .set_match_result(game.match_id, *result)
                .unwrap();
        }
    };

    let first = next_round(&services, tournament_id);
    let second = next_round(&services, tournament_id);
    submit(&first);
    let before_third = roster(&services, tournament_id);
    let third = next_round(&services, tournament_id);
    submit(&second);
    submit(&third);

    assert_eq!(services.tournaments.rollback_round(tournament_id).unwrap(), 2);
    assert_eq!(roster(&services, tournament_id), before_third);
    assert!(services
        .tournaments
        .matches_for_round(tournament_id, 2)
        .unwrap()
        .iter()
        .all(|game| game.result.is_none()));

    assert_eq!(services.tournaments.rollback_round(tournament_id).unwrap(), 1);
    assert_eq!(services.tournaments.rollback_round(tournament_id).unwrap(), 0);
    assert_eq!(roster(&services, tournament_id), initial);
}

#[test]
fn test_late_results_roll_back_exactly_in_swiss() {
    assert_late_results_roll_back_exactly(SystemType::Swiss);
}

#[test]
fn test_late_results_roll_back_exactly_in_round_robin() {
    assert_late_results_roll_back_exactly(SystemType::RoundRobin);
}

#[test]
fn test_rollback_requires_a_played_round() {
    let (services, pool) = setup();
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &[1500.0, 1400.0], 2);

    let err = services.tournaments.rollback_round(tournament_id).unwrap_err();
    assert!(matches!(err, TournamentError::IllegalState(_)));
}

#[test]
fn test_batch_results_keep_earlier_successes() {
    let (services, pool) = setup();
    let ratings = [1600.0, 1500.0, 1400.0, 1300.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 3);
    let matches = next_round(&services, tournament_id);

    let err = services
        .matches
        .set_results(&[
            (matches[0].match_id, 1.0),
            (404, 1.0),
            (matches[1].match_id, 0.5),
        ])
        .unwrap_err();
    assert!(matches!(err, TournamentError::MatchNotFound(404)));

    let first = services.matches.find_match(matches[0].match_id).unwrap();
    let second = services.matches.find_match(matches[1].match_id).unwrap();
    assert_eq!(first.result, Some(1.0));
    assert_eq!(second.result, None);

    let views = services
        .matches
        .set_results(&[(matches[1].match_id, 0.5)])
        .unwrap();
    assert_eq!(views.len(), 1);
}

#[test]
fn test_finishing_syncs_profiles_and_closes_the_tournament() {
    let (services, pool) = setup();
    let (tournament_id, _) = start(&services, &pool, SystemType::RoundRobin, &[1500.0, 1500.0], 1);
    let matches = next_round(&services, tournament_id);
    play(&services, &matches, 1.0);

    assert_eq!(services.tournaments.generate_next_round(tournament_id).unwrap(), 1);
    let tournament = services.tournaments.tournament(tournament_id).unwrap();
    assert_eq!(tournament.stage, Stage::Finished);
    assert!(services.tournaments.list_running().unwrap().is_empty());

    let white_user = matches[0].white_player.user_id;
    {
        let conn = database::get_connection(&pool).unwrap();
        let user = database::users::find_by_id(&conn, white_user).unwrap().unwrap();
        assert_eq!(user.rating, 1520.0);
        assert_eq!(user.amount_of_matches, 1);
        assert_eq!(user.amount_of_wins, 1);
    }

    let err = services.tournaments.generate_next_round(tournament_id).unwrap_err();
    assert!(matches!(err, TournamentError::IllegalState(_)));
    let err = services.tournaments.rollback_round(tournament_id).unwrap_err();
    assert!(matches!(err, TournamentError::IllegalState(_)));
}

#[test]
fn test_results_are_closed_after_finishing() {
    let (services, pool) = setup();
    let (tournament_id, _) = start(&services, &pool, SystemType::RoundRobin, &[1500.0, 1500.0], 1);
    let matches = next_round(&services, tournament_id);
    services.tournaments.generate_next_round(tournament_id).unwrap();

    let err = services
        .matches
        .set_match_result(matches[0].match_id, 1.0)
        .unwrap_err();
    assert!(matches!(err, TournamentError::IllegalState(_)));
}

#[test]
fn test_deleting_finished_tournament_restores_profiles() {
    let (services, pool) = setup();
    let ratings = [1700.0, 1600.0, 1500.0, 1400.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 2);
    for _ in 0..2 {
        let matches = next_round(&services, tournament_id);
        play(&services, &matches, 1.0);
    }
    services.tournaments.generate_next_round(tournament_id).unwrap();

    services.tournaments.delete_tournament(tournament_id).unwrap();

    let err = services.tournaments.tournament(tournament_id).unwrap_err();
    assert!(matches!(err, TournamentError::TournamentNotFound(_)));

    let conn = database::get_connection(&pool).unwrap();
    for (index, rating) in ratings.iter().enumerate() {
        let user = database::users::find_by_id(&conn, index as i32 + 1)
            .unwrap()
            .unwrap();
        assert_eq!(user.rating, *rating);
        assert_eq!(user.amount_of_matches, 0);
        assert_eq!(user.amount_of_wins + user.amount_of_losses + user.amount_of_draws, 0);
    }
    let leftovers: i64 = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM players) + (SELECT COUNT(*) FROM matches) + (SELECT COUNT(*) FROM player_histories)",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(leftovers, 0);
}

#[test]
fn test_registration_rules() {
    let (services, pool) = setup();
    let tournament_id = create(&services, SystemType::Swiss, 3, 2);
    let users = add_users(&pool, &[1500.0, 1500.0, 1500.0]);

    let first = services
        .tournaments
        .register_player(tournament_id, users[0])
        .unwrap();
    assert_eq!(first.standings.rating, 1500.0);

    let err = services
        .tournaments
        .register_player(tournament_id, users[0])
        .unwrap_err();
    assert!(matches!(err, TournamentError::AlreadyRegistered { .. }));

    let err = services.tournaments.register_player(tournament_id, 77).unwrap_err();
    assert!(matches!(err, TournamentError::UserNotFound(77)));

    services
        .tournaments
        .register_player(tournament_id, users[1])
        .unwrap();
    let err = services
        .tournaments
        .register_player(tournament_id, users[2])
        .unwrap_err();
    assert!(matches!(err, TournamentError::TooManyPlayers { have: 3, max: 2 }));

    services.tournaments.generate_next_round(tournament_id).unwrap();
    services.tournaments.remove_player(first.player_id).unwrap_err();
}

#[test]
fn test_player_can_leave_before_the_first_round() {
    let (services, pool) = setup();
    let ratings = [1500.0, 1400.0, 1300.0];
    let (tournament_id, players) = start(&services, &pool, SystemType::Swiss, &ratings, 2);

    services.tournaments.remove_player(players[2]).unwrap();
    assert_eq!(roster(&services, tournament_id).len(), 2);

    let err = services.tournaments.remove_player(players[2]).unwrap_err();
    assert!(matches!(err, TournamentError::PlayerNotFound(_)));
}

#[test]
fn test_round_generation_checks_roster_size() {
    let (services, pool) = setup();
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &[1500.0], 2);

    let err = services
        .tournaments
        .generate_next_round(tournament_id)
        .unwrap_err();
    assert!(matches!(err, TournamentError::NotEnoughPlayers { have: 1, need: 2 }));
}

#[test]
fn test_concurrent_results_on_one_match() {
    let (services, pool) = setup();
    let (tournament_id, _) = start(&services, &pool, SystemType::RoundRobin, &[1500.0, 1500.0], 1);
    let match_id = next_round(&services, tournament_id)[0].match_id;

    let outcomes: Vec<bool> = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| services.matches.set_match_result(match_id, 1.0).is_ok()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    let players = roster(&services, tournament_id);
    assert_eq!(players.iter().map(|p| p.standings.matches).sum::<i32>(), 2);
}

#[test]
fn test_standings_rank_by_score_then_opponent_scores() {
    let (services, pool) = setup();
    let ratings = [1700.0, 1600.0, 1500.0, 1400.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 2);
    let matches = next_round(&services, tournament_id);
    play(&services, &matches, 1.0);

    let rows = services.tournaments.standings(tournament_id).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows.iter().map(|row| row.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    assert!(rows.windows(2).all(|pair| pair[0].score >= pair[1].score));
    // winners faced players with no points
    assert_eq!(rows[0].score, 1.0);
    assert_eq!(rows[0].second_score, 0.0);
    assert_eq!(rows[3].second_score, 1.0);
}

#[test]
fn test_settings_can_change_until_the_first_round() {
    let (services, pool) = setup();
    let ratings = [1600.0, 1500.0, 1400.0];
    let (tournament_id, _) = start(&services, &pool, SystemType::Swiss, &ratings, 3);

    let view = services
        .tournaments
        .update_tournament(
            tournament_id,
            &TournamentUpdate {
                name: Some("Autumn Cup".into()),
                amount_of_rounds: Some(2),
                ..TournamentUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(view.name, "Autumn Cup");
    assert_eq!(view.amount_of_rounds, 2);
    assert_eq!(view.max_players, 32);

    let err = services
        .tournaments
        .update_tournament(
            tournament_id,
            &TournamentUpdate {
                min_players: Some(1),
                ..TournamentUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, TournamentError::IllegalArgument(_)));

    let err = services
        .tournaments
        .update_tournament(
            tournament_id,
            &TournamentUpdate {
                max_players: Some(2),
                ..TournamentUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, TournamentError::TooManyPlayers { have: 3, max: 2 }));
    assert_eq!(
        services.tournaments.tournament(tournament_id).unwrap().max_players,
        32
    );

    next_round(&services, tournament_id);
    let err = services
        .tournaments
        .update_tournament(
            tournament_id,
            &TournamentUpdate {
                amount_of_rounds: Some(5),
                ..TournamentUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, TournamentError::IllegalState(_)));
}

#[test]
fn test_user_history_spans_tournaments() {
    let (services, pool) = setup();
    let user_ids = add_users(&pool, &[1600.0, 1500.0, 1400.0]);
    let spring = create(&services, SystemType::RoundRobin, 2, 8);
    let autumn = create(&services, SystemType::Swiss, 1, 8);
    for user_id in &user_ids {
        services.tournaments.register_player(spring, *user_id).unwrap();
    }
    for user_id in &user_ids[..2] {
        services.tournaments.register_player(autumn, *user_id).unwrap();
    }

    let spring_games: Vec<MatchView> = (0..2)
        .flat_map(|_| next_round(&services, spring))
        .collect();
    let autumn_games = next_round(&services, autumn);

    let history = services.matches.matches_for_user(user_ids[0]).unwrap();
    let expected = spring_games
        .iter()
        .chain(&autumn_games)
        .filter(|game| {
            game.white_player.user_id == user_ids[0] || game.black_player.user_id == user_ids[0]
        })
        .count();
    assert_eq!(history.len(), expected);
    assert!(history.iter().any(|game| game.tournament_id == spring));
    assert!(history.iter().any(|game| game.tournament_id == autumn));
    assert!(history.windows(2).all(|pair| pair[0].match_id > pair[1].match_id));

    let err = services.matches.matches_for_user(404).unwrap_err();
    assert!(matches!(err, TournamentError::UserNotFound(404)));
}
