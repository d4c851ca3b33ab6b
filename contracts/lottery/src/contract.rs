use cosmwasm_std::{
    ensure, ensure_eq, to_json_binary, BankMsg, Binary, Deps, DepsMut, Empty, Env, Event,
    MessageInfo, Order, QueryResponse, Reply, Response, StdError, StdResult, SubMsg,
    SubMsgResult, Uint128, Uint256, WasmMsg,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use vrf_protocol::{request_id_from_events, CoordinatorExecuteMsg, RandomWordsRequest};

use crate::attributes::{
    ATTR_ACTION, ATTR_PARTICIPANT, ATTR_PRIZE, ATTR_REQUEST_ID, ATTR_WINNER, EVENT_TYPE_ENTERED,
    EVENT_TYPE_REQUESTED_WINNER, EVENT_TYPE_WINNER_SELECTED,
};
use crate::draw::winner_index;
use crate::error::ContractError;
use crate::msg::{
    CheckUpkeepResponse, ConfigResponse, ExecuteMsg, InstantiateMsg, LotteryStateResponse,
    ParticipantCountResponse, ParticipantsResponse, PendingRequestResponse, PotResponse, QueryMsg,
    RecentWinnerResponse, TimestampResponse, WinnersResponse,
};
use crate::state::{
    participant_at, participants_clear, participants_len, participants_push, participants_range,
    recent_winner, winners_add, winners_asc, winners_desc, Config, LotteryState, PendingRequest,
    Winner, CONFIG, LAST_TIMESTAMP, LOTTERY_STATE, PENDING_REQUEST,
};
use crate::upkeep::UpkeepStatus;

const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reply of the randomness request to the coordinator
pub const REQUEST_REPLY_ID: u64 = 1;
/// Reply of a failed prize payout
pub const PAYOUT_REPLY_ID: u64 = 2;

pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;
/// One hour
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 3600;

/// Every draw needs exactly one word
const NUM_WORDS: u32 = 1;

/// Page size of list queries
const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 1000;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let InstantiateMsg {
        manager,
        coordinator,
        subscription_id,
        key_hash,
        request_confirmations,
        callback_gas_limit,
        interval,
        minimum_entry_fee,
        request_timeout,
    } = msg;

    ensure!(key_hash.len() == 32, ContractError::InvalidKeyHash);
    let manager = match manager {
        Some(ma) => deps.api.addr_validate(&ma)?,
        None => info.sender,
    };
    let coordinator = deps.api.addr_validate(&coordinator)?;

    let config = Config {
        manager,
        coordinator,
        subscription_id,
        key_hash,
        request_confirmations: request_confirmations.unwrap_or(DEFAULT_REQUEST_CONFIRMATIONS),
        callback_gas_limit,
        interval,
        minimum_entry_fee,
        request_timeout: request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
    };
    CONFIG.save(deps.storage, &config)?;
    LOTTERY_STATE.save(deps.storage, &LotteryState::Open)?;
    LAST_TIMESTAMP.save(deps.storage, &env.block.time)?;
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "instantiate")
        .add_attribute("coordinator", config.coordinator)
        .add_attribute("minimum_entry_fee", config.minimum_entry_fee.to_string())
        .add_attribute("interval", config.interval.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(_deps: DepsMut, _env: Env, _msg: Empty) -> StdResult<Response> {
    Ok(Response::default())
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::EnterLottery {} => execute_enter_lottery(deps, info),
        ExecuteMsg::PerformUpkeep { perform_data } => {
            execute_perform_upkeep(deps, env, perform_data)
        }
        ExecuteMsg::RawFulfillRandomWords {
            request_id,
            random_words,
        } => execute_raw_fulfill_random_words(deps, env, info, request_id, random_words),
        ExecuteMsg::RetryRandomnessRequest {} => execute_retry_randomness_request(deps, env, info),
    }
}

fn execute_enter_lottery(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let state = LOTTERY_STATE.load(deps.storage)?;
    ensure_eq!(state, LotteryState::Open, ContractError::Closed);

    let config = CONFIG.load(deps.storage)?;
    let required = config.minimum_entry_fee;
    let paid: Uint128 = info
        .funds
        .iter()
        .filter(|coin| coin.denom == required.denom)
        .map(|coin| coin.amount)
        .sum();
    ensure!(
        paid >= required.amount,
        ContractError::FeeNotEnough { required }
    );

    participants_push(deps.storage, &info.sender)?;

    let event = Event::new(EVENT_TYPE_ENTERED).add_attribute(ATTR_PARTICIPANT, &info.sender);
    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "enter_lottery")
        .add_event(event))
}

fn execute_perform_upkeep(
    deps: DepsMut,
    env: Env,
    perform_data: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let status = UpkeepStatus::load(deps.as_ref(), &env, &config)?;
    if !status.upkeep_needed(config.interval) {
        return Err(ContractError::UpkeepNotNeeded {
            balance: status.balance,
            participants: status.participants,
            state: status.state,
        });
    }

    LOTTERY_STATE.save(deps.storage, &LotteryState::Calculating)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "perform_upkeep")
        .add_attribute("perform_data", perform_data.to_base64())
        .add_submessage(request_randomness_msg(&config)?))
}

/// Replaces a pending request that the coordinator did not fulfill (successfully) in time.
fn execute_retry_randomness_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_eq!(info.sender, config.manager, ContractError::Unauthorized);
    let state = LOTTERY_STATE.load(deps.storage)?;
    ensure_eq!(
        state,
        LotteryState::Calculating,
        ContractError::NotCalculating
    );

    let mut response = Response::new().add_attribute(ATTR_ACTION, "retry_randomness_request");
    if let Some(pending) = PENDING_REQUEST.may_load(deps.storage)? {
        let retry_after = pending.requested_at.plus_seconds(config.request_timeout);
        ensure!(
            env.block.time >= retry_after,
            ContractError::RequestNotTimedOut { retry_after }
        );
        PENDING_REQUEST.remove(deps.storage);
        response = response.add_attribute("replaced_request_id", pending.request_id.to_string());
    }

    Ok(response.add_submessage(request_randomness_msg(&config)?))
}

/// The request to the coordinator. The request ID is read from the reply.
fn request_randomness_msg(config: &Config) -> StdResult<SubMsg> {
    let msg = CoordinatorExecuteMsg::RequestRandomWords(RandomWordsRequest {
        key_hash: config.key_hash.clone(),
        subscription_id: config.subscription_id,
        request_confirmations: config.request_confirmations,
        callback_gas_limit: config.callback_gas_limit,
        num_words: NUM_WORDS,
    });
    Ok(SubMsg::reply_on_success(
        WasmMsg::Execute {
            contract_addr: config.coordinator.to_string(),
            msg: to_json_binary(&msg)?,
            funds: vec![],
        },
        REQUEST_REPLY_ID,
    ))
}

fn execute_raw_fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_eq!(
        info.sender,
        config.coordinator,
        ContractError::OnlyCoordinatorCanFulfill {
            have: info.sender.to_string(),
            want: config.coordinator.to_string(),
        }
    );
    fulfill_random_words(deps, env, config, request_id, random_words)
}

fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    config: Config,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    match PENDING_REQUEST.may_load(deps.storage)? {
        Some(pending) if pending.request_id == request_id => {}
        _ => return Err(ContractError::InvalidRequest { request_id }),
    }
    let Some(random_word) = random_words.first() else {
        return Err(ContractError::NoRandomWords);
    };

    let participants = participants_len(deps.storage)?;
    ensure!(participants > 0, ContractError::NoParticipants);
    let index = winner_index(*random_word, participants);
    let winner = participant_at(deps.storage, index)?.ok_or(ContractError::NoParticipants)?;

    participants_clear(deps.storage)?;
    LAST_TIMESTAMP.save(deps.storage, &env.block.time)?;
    LOTTERY_STATE.save(deps.storage, &LotteryState::Open)?;
    PENDING_REQUEST.remove(deps.storage);

    let prize = deps.querier.query_balance(
        env.contract.address.as_str(),
        &config.minimum_entry_fee.denom,
    )?;
    winners_add(
        deps.storage,
        &Winner {
            address: winner.clone(),
            prize: prize.clone(),
            request_id,
            time: env.block.time,
        },
    )?;

    let event = Event::new(EVENT_TYPE_WINNER_SELECTED)
        .add_attribute(ATTR_WINNER, &winner)
        .add_attribute(ATTR_PRIZE, prize.to_string())
        .add_attribute(ATTR_REQUEST_ID, request_id.to_string());
    let mut response = Response::new()
        .add_attribute(ATTR_ACTION, "fulfill_random_words")
        .add_event(event);
    if !prize.amount.is_zero() {
        // A failed payout fails the whole fulfillment
        response = response.add_submessage(SubMsg::reply_on_error(
            BankMsg::Send {
                to_address: winner.into_string(),
                amount: vec![prize],
            },
            PAYOUT_REPLY_ID,
        ));
    }
    Ok(response)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, reply: Reply) -> Result<Response, ContractError> {
    match reply.id {
        REQUEST_REPLY_ID => reply_request(deps, env, reply.result),
        PAYOUT_REPLY_ID => reply_payout(reply.result),
        id => Err(ContractError::InvalidReplyId { id }),
    }
}

fn reply_request(deps: DepsMut, env: Env, result: SubMsgResult) -> Result<Response, ContractError> {
    let response = result.into_result().map_err(StdError::generic_err)?;
    let request_id =
        request_id_from_events(&response.events).ok_or(ContractError::MissingRequestId)?;
    ensure!(
        PENDING_REQUEST.may_load(deps.storage)?.is_none(),
        ContractError::RequestAlreadyPending
    );
    PENDING_REQUEST.save(
        deps.storage,
        &PendingRequest {
            request_id,
            requested_at: env.block.time,
        },
    )?;

    let event =
        Event::new(EVENT_TYPE_REQUESTED_WINNER).add_attribute(ATTR_REQUEST_ID, request_id.to_string());
    Ok(Response::new().add_event(event))
}

fn reply_payout(result: SubMsgResult) -> Result<Response, ContractError> {
    match result {
        SubMsgResult::Ok(_) => Ok(Response::new()),
        SubMsgResult::Err(reason) => Err(ContractError::TransactionFailed { reason }),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    let response = match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?)?,
        QueryMsg::LotteryState {} => to_json_binary(&query_lottery_state(deps)?)?,
        QueryMsg::Participants { offset, limit } => {
            to_json_binary(&query_participants(deps, offset, limit)?)?
        }
        QueryMsg::ParticipantCount {} => to_json_binary(&query_participant_count(deps)?)?,
        QueryMsg::WinnersAsc { offset, limit } => {
            to_json_binary(&query_winners(deps, offset, limit, Order::Ascending)?)?
        }
        QueryMsg::WinnersDesc { offset, limit } => {
            to_json_binary(&query_winners(deps, offset, limit, Order::Descending)?)?
        }
        QueryMsg::RecentWinner {} => to_json_binary(&query_recent_winner(deps)?)?,
        QueryMsg::LastTimestamp {} => to_json_binary(&query_last_timestamp(deps)?)?,
        QueryMsg::CurrentTimestamp {} => to_json_binary(&TimestampResponse {
            timestamp: env.block.time,
        })?,
        QueryMsg::PendingRequest {} => to_json_binary(&query_pending_request(deps)?)?,
        QueryMsg::CheckUpkeep { check_data } => {
            to_json_binary(&query_check_upkeep(deps, env, check_data)?)?
        }
        QueryMsg::Pot {} => to_json_binary(&query_pot(deps, env)?)?,
    };
    Ok(response)
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    CONFIG.load(deps.storage)
}

fn query_lottery_state(deps: Deps) -> StdResult<LotteryStateResponse> {
    Ok(LotteryStateResponse {
        state: LOTTERY_STATE.load(deps.storage)?,
    })
}

fn query_participants(
    deps: Deps,
    offset: Option<u32>,
    limit: Option<u32>,
) -> StdResult<ParticipantsResponse> {
    let offset = offset.unwrap_or_default();
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    Ok(ParticipantsResponse {
        participants: participants_range(deps.storage, offset, limit)?,
    })
}

fn query_participant_count(deps: Deps) -> StdResult<ParticipantCountResponse> {
    Ok(ParticipantCountResponse {
        count: participants_len(deps.storage)?,
    })
}

fn query_winners(
    deps: Deps,
    offset: Option<u32>,
    limit: Option<u32>,
    order: Order,
) -> StdResult<WinnersResponse> {
    let offset = offset.unwrap_or_default() as usize;
    let limit = limit
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT) as usize;
    let winners = match order {
        Order::Ascending => winners_asc(deps.storage, offset, limit)?,
        Order::Descending => winners_desc(deps.storage, offset, limit)?,
    };
    Ok(WinnersResponse { winners })
}

fn query_recent_winner(deps: Deps) -> StdResult<RecentWinnerResponse> {
    Ok(RecentWinnerResponse {
        winner: recent_winner(deps.storage)?,
    })
}

fn query_last_timestamp(deps: Deps) -> StdResult<TimestampResponse> {
    Ok(TimestampResponse {
        timestamp: LAST_TIMESTAMP.load(deps.storage)?,
    })
}

fn query_pending_request(deps: Deps) -> StdResult<PendingRequestResponse> {
    Ok(PendingRequestResponse {
        pending: PENDING_REQUEST.may_load(deps.storage)?,
    })
}

fn query_check_upkeep(deps: Deps, env: Env, check_data: Binary) -> StdResult<CheckUpkeepResponse> {
    let config = CONFIG.load(deps.storage)?;
    let status = UpkeepStatus::load(deps, &env, &config)?;
    Ok(CheckUpkeepResponse {
        upkeep_needed: status.upkeep_needed(config.interval),
        perform_data: check_data,
    })
}

fn query_pot(deps: Deps, env: Env) -> StdResult<PotResponse> {
    let config = CONFIG.load(deps.storage)?;
    let balance = deps.querier.query_balance(
        env.contract.address.as_str(),
        &config.minimum_entry_fee.denom,
    )?;
    Ok(PotResponse {
        amount: balance.amount,
        denom: balance.denom,
    })
}
