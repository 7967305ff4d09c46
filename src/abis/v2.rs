use alloy::sol;

// Reserves are declared as two full words; the trailing timestamp word of a
// real UniswapV2 pair is ignored by the non-validating decoder.
sol! {
    #[sol(rpc)]
    interface IUniswapV2Pair {
        function token0() external view returns (address);
        function getReserves() external view returns (uint256 reserve0, uint256 reserve1);
        function totalSupply() external view returns (uint256);
    }
}
