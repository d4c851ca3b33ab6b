use cosmwasm_std::{
    ensure, ensure_eq, from_json, to_json_binary, Deps, DepsMut, Empty, Env, Event, MessageInfo,
    QueryResponse, Reply, Response, StdError, StdResult, SubMsg, SubMsgResult, Uint128, Uint256,
    WasmMsg,
};
#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use vrf_protocol::{
    ConsumerExecuteMsg, RandomWordsRequest, ATTR_CONSUMER, ATTR_PAYMENT, ATTR_REQUEST_ID,
    ATTR_SUBSCRIPTION_ID, EVENT_TYPE_RANDOM_WORDS_FULFILLED, EVENT_TYPE_RANDOM_WORDS_REQUESTED,
    EVENT_TYPE_SUBSCRIPTION_CREATED, MAX_CALLBACK_GAS_LIMIT, MAX_CONSUMERS, MAX_NUM_WORDS,
    MAX_REQUEST_CONFIRMATIONS,
};

use crate::attributes::{
    ATTR_ACTION, ATTR_CALLBACK_ERROR_MSG, ATTR_CALLBACK_SUCCESS, EVENT_TYPE_CALLBACK,
};
use crate::error::ContractError;
use crate::msg::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, QueryMsg, RequestResponse, SubscriptionResponse,
};
use crate::randomness::derive_random_words;
use crate::state::{
    next_request_id, next_subscription_id, Config, Request, Subscription, CONFIG, REQUESTS,
    SUBSCRIPTIONS,
};

const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CALLBACK_ID: u64 = 456;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    CONFIG.save(
        deps.storage,
        &Config {
            base_fee: msg.base_fee,
        },
    )?;
    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "instantiate")
        .add_attribute("base_fee", msg.base_fee))
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
        ExecuteMsg::CreateSubscription {} => execute_create_subscription(deps, info),
        ExecuteMsg::FundSubscription {
            subscription_id,
            amount,
        } => execute_fund_subscription(deps, subscription_id, amount),
        ExecuteMsg::AddConsumer {
            subscription_id,
            consumer,
        } => execute_add_consumer(deps, info, subscription_id, consumer),
        ExecuteMsg::RemoveConsumer {
            subscription_id,
            consumer,
        } => execute_remove_consumer(deps, info, subscription_id, consumer),
        ExecuteMsg::RequestRandomWords(request) => {
            execute_request_random_words(deps, env, info, request)
        }
        ExecuteMsg::FulfillRandomWords {
            request_id,
            consumer,
        } => execute_fulfill_impl(deps, request_id, consumer, None, "fulfill_random_words"),
        ExecuteMsg::FulfillRandomWordsWithOverride {
            request_id,
            consumer,
            words,
        } => execute_fulfill_impl(
            deps,
            request_id,
            consumer,
            Some(words),
            "fulfill_random_words_with_override",
        ),
    }
}

fn execute_create_subscription(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let subscription_id = next_subscription_id(deps.storage)?;
    SUBSCRIPTIONS.save(
        deps.storage,
        subscription_id,
        &Subscription {
            owner: info.sender.clone(),
            balance: Uint128::zero(),
            consumers: vec![],
            request_count: 0,
        },
    )?;

    let event = Event::new(EVENT_TYPE_SUBSCRIPTION_CREATED)
        .add_attribute(ATTR_SUBSCRIPTION_ID, subscription_id.to_string())
        .add_attribute("owner", info.sender);
    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "create_subscription")
        .add_event(event))
}

fn execute_fund_subscription(
    deps: DepsMut,
    subscription_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    ensure!(!amount.is_zero(), ContractError::ZeroFunding);
    let mut subscription = load_subscription(deps.as_ref(), subscription_id)?;
    subscription.balance = subscription
        .balance
        .checked_add(amount)
        .map_err(StdError::from)?;
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "fund_subscription")
        .add_attribute(ATTR_SUBSCRIPTION_ID, subscription_id.to_string())
        .add_attribute("balance", subscription.balance))
}

fn execute_add_consumer(
    deps: DepsMut,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let consumer = deps.api.addr_validate(&consumer)?;
    let mut subscription = load_subscription(deps.as_ref(), subscription_id)?;
    ensure_eq!(info.sender, subscription.owner, ContractError::MustBeSubOwner);

    // Adding a consumer twice is a no-op
    if !subscription.consumers.contains(&consumer) {
        ensure!(
            subscription.consumers.len() < MAX_CONSUMERS,
            ContractError::TooManyConsumers
        );
        subscription.consumers.push(consumer.clone());
        SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;
    }

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "add_consumer")
        .add_attribute(ATTR_SUBSCRIPTION_ID, subscription_id.to_string())
        .add_attribute(ATTR_CONSUMER, consumer))
}

fn execute_remove_consumer(
    deps: DepsMut,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let consumer = deps.api.addr_validate(&consumer)?;
    let mut subscription = load_subscription(deps.as_ref(), subscription_id)?;
    ensure_eq!(info.sender, subscription.owner, ContractError::MustBeSubOwner);

    let before = subscription.consumers.len();
    subscription.consumers.retain(|c| *c != consumer);
    ensure!(
        subscription.consumers.len() < before,
        ContractError::InvalidConsumer { subscription_id }
    );
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "remove_consumer")
        .add_attribute(ATTR_SUBSCRIPTION_ID, subscription_id.to_string())
        .add_attribute(ATTR_CONSUMER, consumer))
}

fn execute_request_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request: RandomWordsRequest,
) -> Result<Response, ContractError> {
    let RandomWordsRequest {
        key_hash,
        subscription_id,
        request_confirmations,
        callback_gas_limit,
        num_words,
    } = request;

    let mut subscription = load_subscription(deps.as_ref(), subscription_id)?;
    ensure!(
        subscription.consumers.contains(&info.sender),
        ContractError::InvalidConsumer { subscription_id }
    );
    ensure!(
        (1..=MAX_NUM_WORDS).contains(&num_words),
        ContractError::InvalidNumWords { max: MAX_NUM_WORDS }
    );
    ensure!(
        callback_gas_limit <= MAX_CALLBACK_GAS_LIMIT,
        ContractError::GasLimitTooBig {
            have: callback_gas_limit,
            want: MAX_CALLBACK_GAS_LIMIT,
        }
    );
    ensure!(
        request_confirmations <= MAX_REQUEST_CONFIRMATIONS,
        ContractError::InvalidRequestConfirmations {
            have: request_confirmations,
            want: MAX_REQUEST_CONFIRMATIONS,
        }
    );

    let request_id = next_request_id(deps.storage)?;
    REQUESTS.save(
        deps.storage,
        request_id,
        &Request {
            consumer: info.sender.clone(),
            subscription_id,
            key_hash,
            request_confirmations,
            callback_gas_limit,
            num_words,
            height: env.block.height,
            time: env.block.time,
        },
    )?;
    subscription.request_count += 1;
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    let event = Event::new(EVENT_TYPE_RANDOM_WORDS_REQUESTED)
        .add_attribute(ATTR_REQUEST_ID, request_id.to_string())
        .add_attribute(ATTR_SUBSCRIPTION_ID, subscription_id.to_string())
        .add_attribute(ATTR_CONSUMER, info.sender);
    Ok(Response::new()
        .add_attribute(ATTR_ACTION, "request_random_words")
        .add_event(event))
}

fn execute_fulfill_impl(
    deps: DepsMut,
    request_id: u64,
    consumer: String,
    words: Option<Vec<Uint256>>,
    action: &str,
) -> Result<Response, ContractError> {
    let consumer = deps.api.addr_validate(&consumer)?;
    let Some(request) = REQUESTS.may_load(deps.storage, request_id)? else {
        return Err(ContractError::InvalidRequest { request_id });
    };
    ensure_eq!(request.consumer, consumer, ContractError::ConsumerMismatch);

    let words = match words {
        Some(words) => {
            ensure!(
                words.len() == request.num_words as usize,
                ContractError::WrongNumberOfWords {
                    have: words.len(),
                    want: request.num_words,
                }
            );
            words
        }
        None => derive_random_words(request_id, &consumer, request.num_words),
    };

    let Config { base_fee } = CONFIG.load(deps.storage)?;
    let mut subscription = load_subscription(deps.as_ref(), request.subscription_id)?;
    subscription.balance = subscription
        .balance
        .checked_sub(base_fee)
        .map_err(|_| ContractError::InsufficientBalance)?;
    SUBSCRIPTIONS.save(deps.storage, request.subscription_id, &subscription)?;
    REQUESTS.remove(deps.storage, request_id);

    // Create the message for executing the callback.
    // This can fail for various reasons, like
    // - `consumer` not being a contract
    // - the contract does not provide the RawFulfillRandomWords {} interface
    // - out of gas
    // - any other processing error in the callback implementation
    // In all those cases the request is consumed anyways.
    let msg = SubMsg::reply_always(
        WasmMsg::Execute {
            contract_addr: consumer.to_string(),
            msg: ConsumerExecuteMsg::fulfill(request_id, words)?,
            funds: vec![],
        },
        CALLBACK_ID,
    )
    .with_gas_limit(request.callback_gas_limit)
    .with_payload(to_json_binary(&request_id)?);

    let event = Event::new(EVENT_TYPE_RANDOM_WORDS_FULFILLED)
        .add_attribute(ATTR_REQUEST_ID, request_id.to_string())
        .add_attribute(ATTR_CONSUMER, consumer)
        .add_attribute(ATTR_PAYMENT, base_fee);
    Ok(Response::new()
        .add_attribute(ATTR_ACTION, action)
        .add_event(event)
        .add_submessage(msg))
}

fn load_subscription(deps: Deps, subscription_id: u64) -> Result<Subscription, ContractError> {
    SUBSCRIPTIONS
        .may_load(deps.storage, subscription_id)?
        .ok_or(ContractError::InvalidSubscription { subscription_id })
}

/// Records the outcome of a consumer callback. The request was removed before the callback
/// was sent and stays consumed whatever the consumer did with it.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(_deps: DepsMut, _env: Env, reply: Reply) -> StdResult<Response> {
    if reply.id != CALLBACK_ID {
        return Err(StdError::generic_err(format!("invalid reply id: {}", reply.id)));
    }
    let request_id: u64 = from_json(&reply.payload)?;

    let mut callback_event =
        Event::new(EVENT_TYPE_CALLBACK).add_attribute(ATTR_REQUEST_ID, request_id.to_string());
    callback_event = match reply.result {
        SubMsgResult::Ok(_) => callback_event.add_attribute(ATTR_CALLBACK_SUCCESS, "true"),
        SubMsgResult::Err(err) => callback_event
            .add_attribute(ATTR_CALLBACK_SUCCESS, "false")
            .add_attribute(ATTR_CALLBACK_ERROR_MSG, err),
    };
    Ok(Response::new().add_event(callback_event))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<QueryResponse> {
    let response = match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?)?,
        QueryMsg::Subscription { subscription_id } => {
            to_json_binary(&query_subscription(deps, subscription_id)?)?
        }
        QueryMsg::Request { request_id } => to_json_binary(&query_request(deps, request_id)?)?,
    };
    Ok(response)
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    CONFIG.load(deps.storage)
}

fn query_subscription(deps: Deps, subscription_id: u64) -> StdResult<SubscriptionResponse> {
    Ok(SubscriptionResponse {
        subscription: SUBSCRIPTIONS.may_load(deps.storage, subscription_id)?,
    })
}

fn query_request(deps: Deps, request_id: u64) -> StdResult<RequestResponse> {
    Ok(RequestResponse {
        request: REQUESTS.may_load(deps.storage, request_id)?,
    })
}
