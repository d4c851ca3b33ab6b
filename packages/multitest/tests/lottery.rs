use anyhow::bail;
use cosmwasm_std::testing::MockApi;
use cosmwasm_std::{
    coin, Addr, Api, BankMsg, BankQuery, Binary, BlockInfo, CustomMsg, CustomQuery, Querier,
    Storage, Timestamp, Uint256,
};
use cw_multi_test::{
    App, AppBuilder, AppResponse, Bank, BankKeeper, BankSudo, CosmosRouter, Executor, Module,
};
use lottery::error::ContractError;
use lottery::msg::{
    CheckUpkeepResponse, ExecuteMsg, LotteryStateResponse, ParticipantsResponse,
    PendingRequestResponse, PotResponse, QueryMsg, RecentWinnerResponse, TimestampResponse,
    WinnersResponse,
};
use lottery::state::{LotteryState, Winner};
use lottery_multitest::{
    advance_time, deploy, find_event, first_attr, mint_native, query_balance_native, Deployment,
    BASE_FEE, SUBSCRIPTION_FUNDING,
};
use lottery_networks::network_by_name;
use serde::de::DeserializeOwned;

const DENOM: &str = "ucosm";
const FEE: u128 = 1_000;
const INTERVAL: u64 = 10;

/// A bank that refuses to send anything to one address
struct BlockingBank {
    inner: BankKeeper,
    blocked: Addr,
}

impl Module for BlockingBank {
    type ExecT = BankMsg;
    type QueryT = BankQuery;
    type SudoT = BankSudo;

    fn execute<ExecC, QueryC>(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        block: &BlockInfo,
        sender: Addr,
        msg: BankMsg,
    ) -> anyhow::Result<AppResponse>
    where
        ExecC: CustomMsg + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        if let BankMsg::Send { to_address, .. } = &msg {
            if to_address.as_str() == self.blocked.as_str() {
                bail!("blocked recipient");
            }
        }
        self.inner.execute(api, storage, router, block, sender, msg)
    }

    fn query(
        &self,
        api: &dyn Api,
        storage: &dyn Storage,
        querier: &dyn Querier,
        block: &BlockInfo,
        request: BankQuery,
    ) -> anyhow::Result<Binary> {
        self.inner.query(api, storage, querier, block, request)
    }

    fn sudo<ExecC, QueryC>(
        &self,
        api: &dyn Api,
        storage: &mut dyn Storage,
        router: &dyn CosmosRouter<ExecC = ExecC, QueryC = QueryC>,
        block: &BlockInfo,
        msg: BankSudo,
    ) -> anyhow::Result<AppResponse>
    where
        ExecC: CustomMsg + DeserializeOwned + 'static,
        QueryC: CustomQuery + DeserializeOwned + 'static,
    {
        self.inner.sudo(api, storage, router, block, msg)
    }
}

impl Bank for BlockingBank {}

fn setup() -> (App, Deployment) {
    let mut app = App::default();
    let network = network_by_name("testing").unwrap();
    let deployment = deploy(&mut app, network, |_| {});
    (app, deployment)
}

fn enter<BankT: Bank>(
    app: &mut App<BankT>,
    deployment: &Deployment,
    participant: &Addr,
    amount: u128,
) -> anyhow::Result<AppResponse> {
    app.execute_contract(
        participant.clone(),
        deployment.lottery.clone(),
        &ExecuteMsg::EnterLottery {},
        &[coin(amount, DENOM)],
    )
}

fn perform_upkeep<BankT: Bank>(
    app: &mut App<BankT>,
    deployment: &Deployment,
) -> anyhow::Result<AppResponse> {
    let keeper = app.api().addr_make("keeper");
    app.execute_contract(
        keeper,
        deployment.lottery.clone(),
        &ExecuteMsg::PerformUpkeep {
            perform_data: Binary::default(),
        },
        &[],
    )
}

fn fulfill<BankT: Bank>(
    app: &mut App<BankT>,
    deployment: &Deployment,
    request_id: u64,
) -> AppResponse {
    app.execute_contract(
        deployment.deployer.clone(),
        deployment.coordinator.clone(),
        &vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
            request_id,
            consumer: deployment.lottery.to_string(),
        },
        &[],
    )
    .unwrap()
}

fn fulfill_with_word(
    app: &mut App,
    deployment: &Deployment,
    request_id: u64,
    word: u32,
) -> AppResponse {
    app.execute_contract(
        deployment.deployer.clone(),
        deployment.coordinator.clone(),
        &vrf_coordinator::msg::ExecuteMsg::FulfillRandomWordsWithOverride {
            request_id,
            consumer: deployment.lottery.to_string(),
            words: vec![Uint256::from(word)],
        },
        &[],
    )
    .unwrap()
}

fn query_state<BankT: Bank>(app: &App<BankT>, deployment: &Deployment) -> LotteryState {
    let LotteryStateResponse { state } = app
        .wrap()
        .query_wasm_smart(&deployment.lottery, &QueryMsg::LotteryState {})
        .unwrap();
    state
}

fn query_participants<BankT: Bank>(app: &App<BankT>, deployment: &Deployment) -> Vec<Addr> {
    let ParticipantsResponse { participants } = app
        .wrap()
        .query_wasm_smart(
            &deployment.lottery,
            &QueryMsg::Participants {
                offset: None,
                limit: None,
            },
        )
        .unwrap();
    participants
}

fn query_upkeep_needed(app: &App, deployment: &Deployment) -> bool {
    let CheckUpkeepResponse { upkeep_needed, .. } = app
        .wrap()
        .query_wasm_smart(
            &deployment.lottery,
            &QueryMsg::CheckUpkeep {
                check_data: Binary::default(),
            },
        )
        .unwrap();
    upkeep_needed
}

fn query_pending_request_id<BankT: Bank>(
    app: &App<BankT>,
    deployment: &Deployment,
) -> Option<u64> {
    let PendingRequestResponse { pending } = app
        .wrap()
        .query_wasm_smart(&deployment.lottery, &QueryMsg::PendingRequest {})
        .unwrap();
    pending.map(|p| p.request_id)
}

fn query_recent_winner<BankT: Bank>(
    app: &App<BankT>,
    deployment: &Deployment,
) -> Option<Winner> {
    let RecentWinnerResponse { winner } = app
        .wrap()
        .query_wasm_smart(&deployment.lottery, &QueryMsg::RecentWinner {})
        .unwrap();
    winner
}

fn query_last_timestamp<BankT: Bank>(app: &App<BankT>, deployment: &Deployment) -> Timestamp {
    let TimestampResponse { timestamp } = app
        .wrap()
        .query_wasm_smart(&deployment.lottery, &QueryMsg::LastTimestamp {})
        .unwrap();
    timestamp
}

fn requested_id(resp: &AppResponse) -> u64 {
    let requested = find_event(&resp.events, "wasm-requested_lottery_winner").unwrap();
    first_attr(&requested.attributes, "request_id")
        .unwrap()
        .parse()
        .unwrap()
}

#[test]
fn single_participant_wins_the_pot() {
    let (mut app, deployment) = setup();
    let alice = app.api().addr_make("alice");
    mint_native(&mut app, &alice, DENOM, 10_000);

    // not enough
    let err = enter(&mut app, &deployment, &alice, FEE - 1).unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        ContractError::FeeNotEnough { .. }
    ));

    let resp = enter(&mut app, &deployment, &alice, FEE).unwrap();
    let entered = find_event(&resp.events, "wasm-lottery_entered").unwrap();
    assert_eq!(
        first_attr(&entered.attributes, "participant").unwrap(),
        alice.to_string()
    );
    assert_eq!(query_participants(&app, &deployment), vec![alice.clone()]);
    let PotResponse { amount, denom } = app
        .wrap()
        .query_wasm_smart(&deployment.lottery, &QueryMsg::Pot {})
        .unwrap();
    assert_eq!(amount.u128(), FEE);
    assert_eq!(denom, DENOM);

    // Too early
    assert!(!query_upkeep_needed(&app, &deployment));
    let err = perform_upkeep(&mut app, &deployment).unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        ContractError::UpkeepNotNeeded {
            participants: 1,
            state: LotteryState::Open,
            ..
        }
    ));

    advance_time(&mut app, INTERVAL);
    assert!(query_upkeep_needed(&app, &deployment));

    let resp = perform_upkeep(&mut app, &deployment).unwrap();
    let request_id = requested_id(&resp);
    assert_eq!(request_id, 1);
    assert_eq!(query_state(&app, &deployment), LotteryState::Calculating);
    assert_eq!(query_pending_request_id(&app, &deployment), Some(1));
    assert!(!query_upkeep_needed(&app, &deployment));

    // The coordinator knows the request
    let vrf_coordinator::msg::RequestResponse { request } = app
        .wrap()
        .query_wasm_smart(
            &deployment.coordinator,
            &vrf_coordinator::msg::QueryMsg::Request { request_id },
        )
        .unwrap();
    let request = request.unwrap();
    assert_eq!(request.consumer, deployment.lottery);
    assert_eq!(request.num_words, 1);
    assert_eq!(request.subscription_id, deployment.subscription_id);

    // Closed while calculating
    let err = enter(&mut app, &deployment, &alice, FEE).unwrap_err();
    assert!(matches!(err.downcast().unwrap(), ContractError::Closed));
    // Second trigger does nothing
    let err = perform_upkeep(&mut app, &deployment).unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        ContractError::UpkeepNotNeeded {
            state: LotteryState::Calculating,
            ..
        }
    ));

    advance_time(&mut app, 5);
    let resp = fulfill(&mut app, &deployment, request_id);
    let selected = find_event(&resp.events, "wasm-winner_selected").unwrap();
    assert_eq!(
        first_attr(&selected.attributes, "winner").unwrap(),
        alice.to_string()
    );
    assert_eq!(
        first_attr(&selected.attributes, "prize").unwrap(),
        format!("{FEE}{DENOM}")
    );
    let callback = find_event(&resp.events, "wasm-vrf-callback").unwrap();
    assert_eq!(first_attr(&callback.attributes, "success").unwrap(), "true");

    // Back to a fresh round
    assert_eq!(query_state(&app, &deployment), LotteryState::Open);
    assert_eq!(query_participants(&app, &deployment), Vec::<Addr>::new());
    assert_eq!(query_pending_request_id(&app, &deployment), None);
    assert_eq!(
        query_last_timestamp(&app, &deployment),
        app.block_info().time
    );
    assert_eq!(
        query_balance_native(&app, &deployment.lottery, DENOM).amount.u128(),
        0
    );
    assert_eq!(
        query_balance_native(&app, &alice, DENOM).amount.u128(),
        10_000
    );
    assert_eq!(
        query_recent_winner(&app, &deployment),
        Some(Winner {
            address: alice,
            prize: coin(FEE, DENOM),
            request_id,
            time: app.block_info().time,
        })
    );

    // The subscription paid for the randomness
    let vrf_coordinator::msg::SubscriptionResponse { subscription } = app
        .wrap()
        .query_wasm_smart(
            &deployment.coordinator,
            &vrf_coordinator::msg::QueryMsg::Subscription {
                subscription_id: deployment.subscription_id,
            },
        )
        .unwrap();
    assert_eq!(
        subscription.unwrap().balance.u128(),
        SUBSCRIPTION_FUNDING - BASE_FEE
    );
}

#[test]
fn two_participants_word_picks_the_winner() {
    let mut app = App::default();
    let network = network_by_name("testing").unwrap();
    let deployment = deploy(&mut app, network, |msg| {
        msg.minimum_entry_fee = coin(1, DENOM);
    });
    let alice = app.api().addr_make("alice");
    let bob = app.api().addr_make("bob");
    mint_native(&mut app, &alice, DENOM, 100);
    mint_native(&mut app, &bob, DENOM, 100);

    enter(&mut app, &deployment, &alice, 1).unwrap();
    enter(&mut app, &deployment, &bob, 1).unwrap();
    advance_time(&mut app, INTERVAL);
    let resp = perform_upkeep(&mut app, &deployment).unwrap();
    let request_id = requested_id(&resp);

    // 7 mod 2 = 1
    fulfill_with_word(&mut app, &deployment, request_id, 7);

    assert_eq!(query_recent_winner(&app, &deployment).unwrap().address, bob);
    assert_eq!(query_balance_native(&app, &alice, DENOM).amount.u128(), 99);
    assert_eq!(query_balance_native(&app, &bob, DENOM).amount.u128(), 101);
}

#[test]
fn derived_randomness_picks_the_winner() {
    let (mut app, deployment) = setup();
    let participants: Vec<Addr> = ["alice", "bob", "carol"]
        .into_iter()
        .map(|name| app.api().addr_make(name))
        .collect();
    for participant in &participants {
        mint_native(&mut app, participant, DENOM, FEE);
        enter(&mut app, &deployment, participant, FEE).unwrap();
    }
    advance_time(&mut app, INTERVAL);
    let request_id = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());
    fulfill(&mut app, &deployment, request_id);

    let word =
        vrf_coordinator::randomness::derive_random_words(request_id, &deployment.lottery, 1)[0];
    let expected = &participants[lottery::draw::winner_index(word, 3) as usize];
    let winner = query_recent_winner(&app, &deployment).unwrap();
    assert_eq!(&winner.address, expected);
    assert_eq!(winner.prize, coin(3 * FEE, DENOM));
    assert_eq!(
        query_balance_native(&app, expected, DENOM).amount.u128(),
        3 * FEE
    );
}

#[test]
fn fulfillment_cannot_be_replayed_or_forged() {
    let (mut app, deployment) = setup();
    let alice = app.api().addr_make("alice");
    mint_native(&mut app, &alice, DENOM, FEE);
    enter(&mut app, &deployment, &alice, FEE).unwrap();
    advance_time(&mut app, INTERVAL);
    let request_id = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());

    // Only the coordinator may deliver randomness
    let err = app
        .execute_contract(
            alice.clone(),
            deployment.lottery.clone(),
            &ExecuteMsg::RawFulfillRandomWords {
                request_id,
                random_words: vec![Uint256::one()],
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        ContractError::OnlyCoordinatorCanFulfill { .. }
    ));
    assert_eq!(query_state(&app, &deployment), LotteryState::Calculating);

    fulfill(&mut app, &deployment, request_id);
    assert_eq!(query_state(&app, &deployment), LotteryState::Open);

    // The coordinator consumed the request
    let err = app
        .execute_contract(
            deployment.deployer.clone(),
            deployment.coordinator.clone(),
            &vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
                request_id,
                consumer: deployment.lottery.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        vrf_coordinator::error::ContractError::InvalidRequest { .. }
    ));

    let WinnersResponse { winners } = app
        .wrap()
        .query_wasm_smart(
            &deployment.lottery,
            &QueryMsg::WinnersAsc {
                offset: None,
                limit: None,
            },
        )
        .unwrap();
    assert_eq!(winners.len(), 1);
}

#[test]
fn manager_can_replace_a_stuck_request() {
    let (mut app, deployment) = setup();
    let alice = app.api().addr_make("alice");
    let bob = app.api().addr_make("bob");
    mint_native(&mut app, &alice, DENOM, FEE);
    enter(&mut app, &deployment, &alice, FEE).unwrap();
    advance_time(&mut app, INTERVAL);
    let stuck_id = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());

    let retry = ExecuteMsg::RetryRandomnessRequest {};
    let err = app
        .execute_contract(deployment.deployer.clone(), deployment.lottery.clone(), &retry, &[])
        .unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        ContractError::RequestNotTimedOut { .. }
    ));

    advance_time(&mut app, lottery::contract::DEFAULT_REQUEST_TIMEOUT);
    let err = app
        .execute_contract(bob, deployment.lottery.clone(), &retry, &[])
        .unwrap_err();
    assert!(matches!(err.downcast().unwrap(), ContractError::Unauthorized));

    let resp = app
        .execute_contract(deployment.deployer.clone(), deployment.lottery.clone(), &retry, &[])
        .unwrap();
    let new_id = requested_id(&resp);
    assert_ne!(new_id, stuck_id);
    assert_eq!(query_pending_request_id(&app, &deployment), Some(new_id));

    // A late answer to the old request is rejected by the lottery.
    // The coordinator reports the failed callback and the lottery keeps waiting.
    let resp = fulfill(&mut app, &deployment, stuck_id);
    let callback = find_event(&resp.events, "wasm-vrf-callback").unwrap();
    assert_eq!(first_attr(&callback.attributes, "success").unwrap(), "false");
    assert!(find_event(&resp.events, "wasm-winner_selected").is_none());
    assert_eq!(query_state(&app, &deployment), LotteryState::Calculating);
    assert_eq!(query_participants(&app, &deployment), vec![alice.clone()]);

    fulfill(&mut app, &deployment, new_id);
    assert_eq!(query_state(&app, &deployment), LotteryState::Open);
    let winner = query_recent_winner(&app, &deployment).unwrap();
    assert_eq!(winner.address, alice);
    assert_eq!(winner.request_id, new_id);
}

#[test]
fn rounds_accumulate_winners() {
    let (mut app, deployment) = setup();
    let alice = app.api().addr_make("alice");
    let bob = app.api().addr_make("bob");
    mint_native(&mut app, &alice, DENOM, 10 * FEE);
    mint_native(&mut app, &bob, DENOM, 10 * FEE);

    // round 1: alice alone
    enter(&mut app, &deployment, &alice, FEE).unwrap();
    advance_time(&mut app, INTERVAL);
    let first = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());
    fulfill(&mut app, &deployment, first);

    // The interval restarts with the new round
    enter(&mut app, &deployment, &bob, 2 * FEE).unwrap();
    advance_time(&mut app, INTERVAL - 1);
    assert!(!query_upkeep_needed(&app, &deployment));
    advance_time(&mut app, 1);
    let second = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());
    fulfill(&mut app, &deployment, second);

    let WinnersResponse { winners } = app
        .wrap()
        .query_wasm_smart(
            &deployment.lottery,
            &QueryMsg::WinnersDesc {
                offset: None,
                limit: None,
            },
        )
        .unwrap();
    let summary: Vec<(Addr, u128, u64)> = winners
        .into_iter()
        .map(|w| (w.address, w.prize.amount.u128(), w.request_id))
        .collect();
    assert_eq!(
        summary,
        vec![(bob.clone(), 2 * FEE, second), (alice, FEE, first)]
    );
    assert_eq!(
        query_balance_native(&app, &bob, DENOM).amount.u128(),
        10 * FEE
    );
}

#[test]
fn failed_payout_rolls_back_the_draw() {
    let alice = MockApi::default().addr_make("alice");
    let mut app = AppBuilder::new()
        .with_bank(BlockingBank {
            inner: BankKeeper::new(),
            blocked: alice.clone(),
        })
        .build(|_, _, _| {});
    let network = network_by_name("testing").unwrap();
    let deployment = deploy(&mut app, network, |_| {});

    mint_native(&mut app, &alice, DENOM, FEE);
    enter(&mut app, &deployment, &alice, FEE).unwrap();
    advance_time(&mut app, INTERVAL);
    let round_start = query_last_timestamp(&app, &deployment);
    let request_id = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());

    advance_time(&mut app, 5);
    let resp = fulfill(&mut app, &deployment, request_id);
    let callback = find_event(&resp.events, "wasm-vrf-callback").unwrap();
    assert_eq!(
        first_attr(&callback.attributes, "request_id").unwrap(),
        request_id.to_string()
    );
    assert_eq!(first_attr(&callback.attributes, "success").unwrap(), "false");
    let error_msg = first_attr(&callback.attributes, "error_msg").unwrap();
    assert!(error_msg.contains("blocked recipient"), "{error_msg}");
    assert!(find_event(&resp.events, "wasm-winner_selected").is_none());

    // Nothing of the draw is kept
    assert_eq!(query_state(&app, &deployment), LotteryState::Calculating);
    assert_eq!(query_participants(&app, &deployment), vec![alice.clone()]);
    assert_eq!(query_pending_request_id(&app, &deployment), Some(request_id));
    assert_eq!(query_recent_winner(&app, &deployment), None);
    assert_eq!(query_last_timestamp(&app, &deployment), round_start);
    assert_eq!(
        query_balance_native(&app, &deployment.lottery, DENOM).amount.u128(),
        FEE
    );
    assert_eq!(query_balance_native(&app, &alice, DENOM).amount.u128(), 0);

    // The coordinator consumed the request anyways
    let vrf_coordinator::msg::RequestResponse { request } = app
        .wrap()
        .query_wasm_smart(
            &deployment.coordinator,
            &vrf_coordinator::msg::QueryMsg::Request { request_id },
        )
        .unwrap();
    assert_eq!(request, None);
    let err = app
        .execute_contract(
            deployment.deployer.clone(),
            deployment.coordinator.clone(),
            &vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords {
                request_id,
                consumer: deployment.lottery.to_string(),
            },
            &[],
        )
        .unwrap_err();
    assert!(matches!(
        err.downcast().unwrap(),
        vrf_coordinator::error::ContractError::InvalidRequest { .. }
    ));
}

#[test]
fn many_participants_complete_a_draw() {
    let (mut app, deployment) = setup();
    let players: Vec<Addr> = (0..250)
        .map(|i| app.api().addr_make(&format!("player{i}")))
        .collect();
    for player in &players {
        mint_native(&mut app, player, DENOM, FEE);
        enter(&mut app, &deployment, player, FEE).unwrap();
    }
    advance_time(&mut app, INTERVAL);
    let request_id = requested_id(&perform_upkeep(&mut app, &deployment).unwrap());

    // 1003 mod 250 = 3
    fulfill_with_word(&mut app, &deployment, request_id, 1003);
    let winner = query_recent_winner(&app, &deployment).unwrap();
    assert_eq!(winner.address, players[3]);
    assert_eq!(winner.prize, coin(250 * FEE, DENOM));
    assert_eq!(query_state(&app, &deployment), LotteryState::Open);
    assert_eq!(query_participants(&app, &deployment), Vec::<Addr>::new());

    // The next round works as usual
    enter(&mut app, &deployment, &players[3], FEE).unwrap();
    assert_eq!(query_participants(&app, &deployment), vec![players[3].clone()]);
}
