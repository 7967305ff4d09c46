use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPriceOracle {
        function getLatestPrice() external view returns (uint256 price, uint8 decimals);
    }
}
