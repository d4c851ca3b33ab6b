// Testing utils. See tests folder for actual tests.

use cosmwasm_std::{coin, Addr, Attribute, Binary, Coin, Event, Uint128};
use cw_multi_test::{App, Bank, BankSudo, ContractWrapper, Executor, SudoMsg};
use lottery::msg::{CheckUpkeepResponse, ExecuteMsg, QueryMsg};
use lottery_client::UpkeepTarget;
use lottery_networks::Network;

/// Flat fee the mock coordinator charges per fulfillment
pub const BASE_FEE: u128 = 100;

/// Bookkeeping balance the deployer funds the subscription with
pub const SUBSCRIPTION_FUNDING: u128 = 1_000_000;

/// Gets the value of the first attribute with the given key
pub fn first_attr(data: impl AsRef<[Attribute]>, search_key: &str) -> Option<String> {
    data.as_ref().iter().find_map(|a| {
        if a.key == search_key {
            Some(a.value.clone())
        } else {
            None
        }
    })
}

/// Gets the first event of the given type
pub fn find_event<'a>(events: &'a [Event], ty: &str) -> Option<&'a Event> {
    events.iter().find(|ev| ev.ty == ty)
}

pub fn mint_native<BankT: Bank>(
    app: &mut App<BankT>,
    beneficiary: &Addr,
    denom: &str,
    amount: u128,
) {
    app.sudo(SudoMsg::Bank(BankSudo::Mint {
        to_address: beneficiary.to_string(),
        amount: vec![coin(amount, denom)],
    }))
    .unwrap();
}

pub fn query_balance_native<BankT: Bank>(app: &App<BankT>, address: &Addr, denom: &str) -> Coin {
    app.wrap().query_balance(address, denom).unwrap()
}

/// Moves the chain forward in time
pub fn advance_time<BankT: Bank>(app: &mut App<BankT>, seconds: u64) {
    app.update_block(|block| {
        block.time = block.time.plus_seconds(seconds);
        block.height += seconds.div_ceil(5);
    });
}

/// Addresses of a lottery deployment in a test chain
#[derive(Debug, Clone)]
pub struct Deployment {
    pub deployer: Addr,
    pub coordinator: Addr,
    pub subscription_id: u64,
    pub lottery: Addr,
}

/// Deploys a mock coordinator and a lottery like on a development chain:
/// store codes, create and fund a subscription, instantiate the lottery
/// and add it as a consumer.
///
/// `customize` can change the lottery instantiation before it is sent.
pub fn deploy<BankT: Bank>(
    app: &mut App<BankT>,
    network: &Network,
    customize: impl FnOnce(&mut lottery::msg::InstantiateMsg),
) -> Deployment {
    let deployer = app.api().addr_make("deployer");

    let code_coordinator = ContractWrapper::new(
        vrf_coordinator::contract::execute,
        vrf_coordinator::contract::instantiate,
        vrf_coordinator::contract::query,
    )
    .with_reply(vrf_coordinator::contract::reply);
    let code_id_coordinator = app.store_code(Box::new(code_coordinator));
    let coordinator = app
        .instantiate_contract(
            code_id_coordinator,
            deployer.clone(),
            &vrf_coordinator::msg::InstantiateMsg {
                base_fee: Uint128::new(BASE_FEE),
            },
            &[],
            "VRF Coordinator Mock",
            None,
        )
        .unwrap();

    let resp = app
        .execute_contract(
            deployer.clone(),
            coordinator.clone(),
            &vrf_coordinator::msg::ExecuteMsg::CreateSubscription {},
            &[],
        )
        .unwrap();
    let created = find_event(&resp.events, "wasm-subscription_created").unwrap();
    let subscription_id: u64 = first_attr(&created.attributes, "subscription_id")
        .unwrap()
        .parse()
        .unwrap();
    app.execute_contract(
        deployer.clone(),
        coordinator.clone(),
        &vrf_coordinator::msg::ExecuteMsg::FundSubscription {
            subscription_id,
            amount: Uint128::new(SUBSCRIPTION_FUNDING),
        },
        &[],
    )
    .unwrap();

    let code_lottery = ContractWrapper::new(
        lottery::contract::execute,
        lottery::contract::instantiate,
        lottery::contract::query,
    )
    .with_reply(lottery::contract::reply);
    let code_id_lottery = app.store_code(Box::new(code_lottery));
    let mut msg = network
        .instantiate_msg(Some(coordinator.as_str()), Some(subscription_id))
        .unwrap();
    customize(&mut msg);
    let lottery = app
        .instantiate_contract(
            code_id_lottery,
            deployer.clone(),
            &msg,
            &[],
            "Lottery",
            None,
        )
        .unwrap();

    app.execute_contract(
        deployer.clone(),
        coordinator.clone(),
        &vrf_coordinator::msg::ExecuteMsg::AddConsumer {
            subscription_id,
            consumer: lottery.to_string(),
        },
        &[],
    )
    .unwrap();

    Deployment {
        deployer,
        coordinator,
        subscription_id,
        lottery,
    }
}

/// A lottery in a test chain, driven by a keeper account
pub struct AppLottery<'a> {
    pub app: &'a mut App,
    pub lottery: Addr,
    pub keeper: Addr,
}

impl UpkeepTarget for AppLottery<'_> {
    type Error = anyhow::Error;

    fn check_upkeep(&mut self, check_data: &Binary) -> Result<CheckUpkeepResponse, Self::Error> {
        let response = self.app.wrap().query_wasm_smart(
            &self.lottery,
            &QueryMsg::CheckUpkeep {
                check_data: check_data.clone(),
            },
        )?;
        Ok(response)
    }

    fn perform_upkeep(&mut self, perform_data: Binary) -> Result<Vec<Event>, Self::Error> {
        let response = self.app.execute_contract(
            self.keeper.clone(),
            self.lottery.clone(),
            &ExecuteMsg::PerformUpkeep { perform_data },
            &[],
        )?;
        Ok(response.events)
    }
}
